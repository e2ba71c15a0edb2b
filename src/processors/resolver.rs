use crate::error::Result;
use crate::models::{City, RecordId, Region, State, Station, StationMetadata, Stored};
use crate::store::Store;
use crate::utils::constants::{region_name, state_name};

/// Surrogate identities of the hierarchy a station was filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedStation {
    pub region_id: RecordId,
    pub state_id: RecordId,
    pub city_id: RecordId,
    pub station_id: RecordId,
}

/// Get-or-create-or-update for the region → state → city → station chain.
///
/// Every call looks the entity up by its natural key, reconciles the mutable
/// fields and writes only when something changed. Calls run in autocommit
/// mode, so an entity resolved here survives a later failure in the same file.
pub struct EntityResolver<'s> {
    store: &'s Store,
}

impl<'s> EntityResolver<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    /// Resolve the whole chain for one metadata header, parents first
    pub fn resolve(&self, metadata: &StationMetadata) -> Result<ResolvedStation> {
        let region = self.ensure_region(&metadata.region_code)?;
        let state = self.ensure_state(&metadata.state_code, region.id)?;
        let city = self.ensure_city(metadata.resolved_city_name(), state.id)?;
        let station = self.ensure_station(metadata, state.id, city.id)?;

        Ok(ResolvedStation {
            region_id: region.id,
            state_id: state.id,
            city_id: city.id,
            station_id: station.id,
        })
    }

    pub fn ensure_region(&self, code: &str) -> Result<Stored<Region>> {
        let regions = self.store.regions();
        let name = region_name(code).unwrap_or(code).to_string();

        match regions.find_by_key(code)? {
            Some(existing) if existing.name == code && name != code => {
                tracing::debug!("Region {}: name set to '{}'", code, name);
                regions.update(
                    existing.id,
                    &Region {
                        code: code.to_string(),
                        name,
                    },
                )
            }
            Some(existing) => Ok(existing),
            None => {
                tracing::debug!("Region {}: created", code);
                regions.insert(&Region {
                    code: code.to_string(),
                    name,
                })
            }
        }
    }

    /// A state found under another region is moved, never duplicated
    pub fn ensure_state(&self, code: &str, region_id: RecordId) -> Result<Stored<State>> {
        let states = self.store.states();
        let known_name = state_name(code).unwrap_or(code);

        match states.find_by_key(code)? {
            Some(existing) => {
                let name = if existing.name == code {
                    known_name.to_string()
                } else {
                    existing.name.clone()
                };
                if existing.region_id == region_id && existing.name == name {
                    return Ok(existing);
                }

                if existing.region_id != region_id {
                    tracing::debug!(
                        "State {}: region {} -> {}",
                        code,
                        existing.region_id,
                        region_id
                    );
                }
                states.update(
                    existing.id,
                    &State {
                        code: code.to_string(),
                        name,
                        region_id,
                    },
                )
            }
            None => {
                tracing::debug!("State {}: created in region {}", code, region_id);
                states.insert(&State {
                    code: code.to_string(),
                    name: known_name.to_string(),
                    region_id,
                })
            }
        }
    }

    pub fn ensure_city(&self, name: &str, state_id: RecordId) -> Result<Stored<City>> {
        let cities = self.store.cities();
        if let Some(existing) = cities.find_by_key(&(name.to_string(), state_id))? {
            return Ok(existing);
        }

        tracing::debug!("City '{}': created in state {}", name, state_id);
        cities.insert(&City {
            name: name.to_string(),
            state_id,
        })
    }

    /// Location and parents are overwritten from the latest header on every call
    pub fn ensure_station(
        &self,
        metadata: &StationMetadata,
        state_id: RecordId,
        city_id: RecordId,
    ) -> Result<Stored<Station>> {
        let stations = self.store.stations();
        let station = Station {
            code: metadata.station_code.clone(),
            latitude: metadata.latitude,
            longitude: metadata.longitude,
            altitude: metadata.altitude,
            city_id,
            state_id,
        };

        match stations.find_by_key(&metadata.station_code)? {
            Some(existing) => {
                if existing.entity != station {
                    tracing::debug!("Station {}: attributes updated", station.code);
                }
                stations.update(existing.id, &station)
            }
            None => {
                tracing::debug!("Station {}: created", station.code);
                stations.insert(&station)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::create_tables;

    fn store() -> Store {
        let store = Store::open_in_memory("inmet").unwrap();
        create_tables(&store, false).unwrap();
        store
    }

    fn metadata(code: &str, latitude: f64) -> StationMetadata {
        StationMetadata {
            region_code: "NE".to_string(),
            state_code: "SE".to_string(),
            station_name: "Aracaju".to_string(),
            station_code: code.to_string(),
            latitude,
            longitude: -37.05,
            altitude: 4.72,
            start_date: None,
            city_name: Some("Aracaju".to_string()),
        }
    }

    #[test]
    fn test_ensure_region_uses_known_names() -> Result<()> {
        let store = store();
        let resolver = EntityResolver::new(&store);

        let sudeste = resolver.ensure_region("SE")?;
        assert_eq!(sudeste.name, "Sudeste");

        let unknown = resolver.ensure_region("XX")?;
        assert_eq!(unknown.name, "XX");

        let again = resolver.ensure_region("SE")?;
        assert_eq!(again.id, sudeste.id);
        assert_eq!(store.regions().count()?, 2);
        Ok(())
    }

    #[test]
    fn test_ensure_region_backfills_name() -> Result<()> {
        let store = store();
        let placeholder = store.regions().insert(&Region {
            code: "N".to_string(),
            name: "N".to_string(),
        })?;

        let resolved = EntityResolver::new(&store).ensure_region("N")?;
        assert_eq!(resolved.id, placeholder.id);
        assert_eq!(resolved.name, "Norte");
        Ok(())
    }

    #[test]
    fn test_ensure_state_reparents() -> Result<()> {
        let store = store();
        let resolver = EntityResolver::new(&store);
        let north = resolver.ensure_region("N")?;
        let northeast = resolver.ensure_region("NE")?;

        let first = resolver.ensure_state("SE", north.id)?;
        assert_eq!(first.name, "Sergipe");
        assert_eq!(first.region_id, north.id);

        let moved = resolver.ensure_state("SE", northeast.id)?;
        assert_eq!(moved.id, first.id);
        assert_eq!(moved.region_id, northeast.id);
        assert_eq!(store.states().count()?, 1);
        assert!(store.states_in_region(north.id)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_ensure_city_is_scoped_to_state() -> Result<()> {
        let store = store();
        let resolver = EntityResolver::new(&store);
        let region = resolver.ensure_region("SE")?;
        let sp = resolver.ensure_state("SP", region.id)?;
        let mg = resolver.ensure_state("MG", region.id)?;

        let a = resolver.ensure_city("Campinas", sp.id)?;
        let b = resolver.ensure_city("Campinas", sp.id)?;
        let c = resolver.ensure_city("Campinas", mg.id)?;

        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
        assert_eq!(store.cities_in_state(sp.id)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_ensure_station_overwrites_location() -> Result<()> {
        let store = store();
        let resolver = EntityResolver::new(&store);

        let first = resolver.resolve(&metadata("A409", -10.95))?;
        let second = resolver.resolve(&metadata("A409", -10.9525))?;

        assert_eq!(first, second);
        let station = store.station_by_code("A409")?.unwrap();
        assert_eq!(station.latitude, -10.9525);
        assert_eq!(store.stations().count()?, 1);
        Ok(())
    }

    #[test]
    fn test_resolve_falls_back_to_station_name_for_city() -> Result<()> {
        let store = store();
        let mut header = metadata("A409", -10.95);
        header.city_name = None;
        header.station_name = "Aracaju Centro".to_string();

        let resolved = EntityResolver::new(&store).resolve(&header)?;
        let city = store.cities().get(resolved.city_id)?.unwrap();
        assert_eq!(city.name, "Aracaju Centro");
        Ok(())
    }
}
