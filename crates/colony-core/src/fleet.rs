//! Fleet - the colony's ships, one hecs entity each.
//!
//! Identity, status, location, hold and orders are separate components;
//! `ShipInstance` values are assembled from them on the way out and split
//! back on the way in.

use std::collections::HashMap;

use hecs::{Entity, EntityBuilder, World};

use crate::components::{Cargo, Destination, ShipHull, ShipId, ShipInstance, ShipLocation, ShipStatus};

/// Ship entities plus an id index.
pub struct Fleet {
    world: World,
    index: HashMap<ShipId, Entity>,
    next_id: u64,
}

fn assemble(
    id: &ShipId,
    hull: &ShipHull,
    status: &ShipStatus,
    location: &ShipLocation,
    cargo: &Cargo,
    destination: Option<&Destination>,
) -> ShipInstance {
    ShipInstance {
        id: *id,
        type_id: hull.type_id.clone(),
        name: hull.name.clone(),
        status: *status,
        location: *location,
        destination: destination.map(|d| d.0),
        cargo: cargo.0,
        cargo_capacity: hull.cargo_capacity,
    }
}

fn split(ship: ShipInstance) -> ((ShipHull, ShipStatus, ShipLocation, Cargo), Option<Destination>) {
    let hull = ShipHull {
        type_id: ship.type_id,
        name: ship.name,
        cargo_capacity: ship.cargo_capacity,
    };
    (
        (hull, ship.status, ship.location, Cargo(ship.cargo)),
        ship.destination.map(Destination),
    )
}

impl Fleet {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            index: HashMap::new(),
            next_id: 1,
        }
    }

    /// Reserve the next ship id. Ids are never reused.
    pub fn allocate_id(&mut self) -> ShipId {
        let id = ShipId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawn(&mut self, ship: ShipInstance) {
        let id = ship.id;
        let ((hull, status, location, cargo), destination) = split(ship);
        let mut builder = EntityBuilder::new();
        builder.add(id).add(hull).add(status).add(location).add(cargo);
        if let Some(destination) = destination {
            builder.add(destination);
        }
        let entity = self.world.spawn(builder.build());
        self.index.insert(id, entity);
    }

    /// Remove a ship, returning its last state.
    pub fn despawn(&mut self, id: ShipId) -> Option<ShipInstance> {
        let entity = *self.index.get(&id)?;
        let ship = self.read(entity)?;
        self.world.despawn(entity).ok()?;
        self.index.remove(&id);
        Some(ship)
    }

    /// Copy of one ship.
    pub fn get(&self, id: ShipId) -> Option<ShipInstance> {
        self.read(*self.index.get(&id)?)
    }

    /// Run `f` against one ship, then write every component back.
    pub fn update<R>(&mut self, id: ShipId, f: impl FnOnce(&mut ShipInstance) -> R) -> Option<R> {
        let entity = *self.index.get(&id)?;
        let mut ship = self.read(entity)?;
        let result = f(&mut ship);
        self.write(entity, ship)?;
        Some(result)
    }

    /// Copies of every ship, ordered by id.
    pub fn ships(&self) -> Vec<ShipInstance> {
        let mut query = self.world.query::<(
            &ShipId,
            &ShipHull,
            &ShipStatus,
            &ShipLocation,
            &Cargo,
            Option<&Destination>,
        )>();
        let mut ships: Vec<ShipInstance> = query
            .iter()
            .map(|(_, (id, hull, status, location, cargo, destination))| {
                assemble(id, hull, status, location, cargo, destination)
            })
            .collect();
        ships.sort_by_key(|ship| ship.id);
        ships
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn read(&self, entity: Entity) -> Option<ShipInstance> {
        let mut query = self
            .world
            .query_one::<(
                &ShipId,
                &ShipHull,
                &ShipStatus,
                &ShipLocation,
                &Cargo,
                Option<&Destination>,
            )>(entity)
            .ok()?;
        let ship = query
            .get()
            .map(|(id, hull, status, location, cargo, destination)| {
                assemble(id, hull, status, location, cargo, destination)
            });
        ship
    }

    /// Replace every component except the id. A cleared destination is
    /// removed from the entity.
    fn write(&mut self, entity: Entity, ship: ShipInstance) -> Option<()> {
        let (parts, destination) = split(ship);
        self.world.insert(entity, parts).ok()?;
        match destination {
            Some(destination) => self.world.insert_one(entity, destination).ok()?,
            None => {
                let has_destination = self.world.get::<&Destination>(entity).is_ok();
                if has_destination {
                    self.world.remove_one::<Destination>(entity).ok()?;
                }
            }
        }
        Some(())
    }
}

impl Default for Fleet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sector::SectorCoord;

    fn scout(fleet: &mut Fleet) -> ShipId {
        let id = fleet.allocate_id();
        fleet.spawn(ShipInstance::new(id, "scout", format!("Scout #{}", id.0), 10.0));
        id
    }

    #[test]
    fn test_spawn_and_get() {
        let mut fleet = Fleet::new();
        let id = scout(&mut fleet);
        assert_eq!(fleet.len(), 1);
        let ship = fleet.get(id).unwrap();
        assert_eq!(ship.type_id, "scout");
        assert_eq!(ship.status, ShipStatus::Constructing);
        assert_eq!(ship.location, ShipLocation::Docked);
        assert!(ship.destination.is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut fleet = Fleet::new();
        let a = scout(&mut fleet);
        let b = scout(&mut fleet);
        assert_ne!(a, b);
        fleet.despawn(a);
        let c = scout(&mut fleet);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn test_update_in_place() {
        let mut fleet = Fleet::new();
        let id = scout(&mut fleet);
        fleet.update(id, |ship| ship.finish_construction());
        assert_eq!(fleet.get(id).unwrap().status, ShipStatus::Idle);
        let idle = fleet
            .world
            .query::<&ShipStatus>()
            .iter()
            .filter(|(_, status)| **status == ShipStatus::Idle)
            .count();
        assert_eq!(idle, 1);
    }

    #[test]
    fn test_destination_component_follows_orders() {
        let mut fleet = Fleet::new();
        let id = scout(&mut fleet);
        let entity = fleet.index[&id];
        let target = SectorCoord { x: 3, y: -2 };

        fleet.update(id, |ship| {
            ship.status = ShipStatus::Moving;
            ship.location = ShipLocation::Sector(SectorCoord::default());
            ship.destination = Some(target);
        });
        assert_eq!(*fleet.world.get::<&Destination>(entity).unwrap(), Destination(target));
        assert_eq!(fleet.get(id).unwrap().destination, Some(target));

        fleet.update(id, |ship| ship.destination = None);
        assert!(fleet.world.get::<&Destination>(entity).is_err());
        assert!(fleet.get(id).unwrap().destination.is_none());
    }

    #[test]
    fn test_cargo_written_back() {
        let mut fleet = Fleet::new();
        let id = scout(&mut fleet);
        fleet.update(id, |ship| ship.cargo[colony_logic::ore::OreType::Gold] = 4.0);
        assert_eq!(fleet.get(id).unwrap().cargo_of(colony_logic::ore::OreType::Gold), 4.0);
    }

    #[test]
    fn test_despawn() {
        let mut fleet = Fleet::new();
        let id = scout(&mut fleet);
        let removed = fleet.despawn(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(fleet.is_empty());
        assert_eq!(fleet.world.len(), 0);
        assert!(fleet.get(id).is_none());
        assert!(fleet.update(id, |_| ()).is_none());
        assert!(fleet.despawn(id).is_none());
    }

    #[test]
    fn test_ships_sorted_by_id() {
        let mut fleet = Fleet::new();
        let ids: Vec<ShipId> = (0..5).map(|_| scout(&mut fleet)).collect();
        let listed: Vec<ShipId> = fleet.ships().iter().map(|s| s.id).collect();
        assert_eq!(listed, ids);
    }
}
