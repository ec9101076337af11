use util::{HashMap, HashSet, IdVec};

use crate::model::{Activity, Exchange, Flow, Inventory, Method};
use crate::{ActivityIdx, Error, FlowIdx, Key};

/// One exchange of an activity definition, as a user would write it.
#[derive(Debug, Clone)]
pub enum ExchangeDef {
    /// Output of the activity's own reference product.
    Production(f64),
    /// Input of another activity's product.
    Technosphere(Key, f64),
    /// Emission to / resource from the environment.
    Biosphere(Key, f64),
}

/// Unresolved activity definition; inputs may reference activities defined later.
#[derive(Debug, Clone)]
pub struct ActivityDef {
    pub key: Key,
    pub name: String,
    pub exchanges: Vec<ExchangeDef>,
}

impl ActivityDef {
    pub fn new(key: Key, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            exchanges: Vec::with_capacity(4),
        }
    }

    pub fn production(mut self, amount: f64) -> Self {
        self.exchanges.push(ExchangeDef::Production(amount));
        self
    }

    pub fn technosphere(mut self, input: Key, amount: f64) -> Self {
        self.exchanges.push(ExchangeDef::Technosphere(input, amount));
        self
    }

    pub fn biosphere(mut self, input: Key, amount: f64) -> Self {
        self.exchanges.push(ExchangeDef::Biosphere(input, amount));
        self
    }
}

/// Collects definitions, then resolves keys to indexes in [`InventoryBuilder::build`].
#[derive(Debug, Default)]
pub struct InventoryBuilder {
    activities: Vec<ActivityDef>,
    flows: Vec<(Key, String)>,
    methods: Vec<(String, Vec<(Key, f64)>)>,
}

impl InventoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flow(mut self, key: Key, name: impl Into<String>) -> Self {
        self.flows.push((key, name.into()));
        self
    }

    pub fn activity(mut self, def: ActivityDef) -> Self {
        self.activities.push(def);
        self
    }

    pub fn method(
        mut self,
        name: impl Into<String>,
        factors: impl IntoIterator<Item = (Key, f64)>,
    ) -> Self {
        self.methods
            .push((name.into(), factors.into_iter().collect()));
        self
    }

    pub fn build(self) -> Result<Inventory, Error> {
        let mut seen = HashSet::default();
        for key in self
            .flows
            .iter()
            .map(|(k, _)| k)
            .chain(self.activities.iter().map(|def| &def.key))
        {
            if !seen.insert(key) {
                return Err(Error::DuplicateKey(key.clone()));
            }
        }

        let flow_idxs: HashMap<&Key, FlowIdx> = self
            .flows
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (k, FlowIdx::from(i)))
            .collect();
        let activity_idxs: HashMap<&Key, ActivityIdx> = self
            .activities
            .iter()
            .enumerate()
            .map(|(i, def)| (&def.key, ActivityIdx::from(i)))
            .collect();

        let mut activities = IdVec::with_capacity(self.activities.len());
        for def in &self.activities {
            let this_idx = activity_idxs[&def.key];
            let activity = resolve_activity(def, this_idx, &activity_idxs, &flow_idxs)?;
            activities.push(activity);
        }

        let flows: IdVec<FlowIdx, Flow> = self
            .flows
            .iter()
            .map(|(key, name)| Flow {
                key: key.clone(),
                name: name.clone(),
            })
            .collect();

        let mut methods = Vec::with_capacity(self.methods.len());
        for (name, factors) in self.methods {
            let mut resolved = HashMap::default();
            for (key, cf) in factors {
                let idx = flow_idxs
                    .get(&key)
                    .ok_or_else(|| Error::UnknownFlow(key.clone()))?;
                *resolved.entry(*idx).or_insert(0.0) += cf;
            }
            methods.push(Method::new(name, resolved));
        }

        log::debug!(
            "built inventory with {} activities, {} flows and {} methods",
            activities.len(),
            flows.len(),
            methods.len(),
        );
        Ok(Inventory::new(activities, flows, methods))
    }
}

fn resolve_activity(
    def: &ActivityDef,
    this_idx: ActivityIdx,
    activity_idxs: &HashMap<&Key, ActivityIdx>,
    flow_idxs: &HashMap<&Key, FlowIdx>,
) -> Result<Activity, Error> {
    let unknown = |input: &Key| Error::UnknownInput {
        activity: def.key.clone(),
        input: input.clone(),
    };

    let mut production = None;
    let mut self_consumption = 0.0;
    let mut technosphere = Vec::with_capacity(def.exchanges.len());
    let mut biosphere = Vec::with_capacity(def.exchanges.len());

    for exc in &def.exchanges {
        match exc {
            ExchangeDef::Production(amount) => {
                *production.get_or_insert(0.0) += amount;
            }
            ExchangeDef::Technosphere(input, amount) => {
                let input = *activity_idxs.get(input).ok_or_else(|| unknown(input))?;
                if input == this_idx {
                    self_consumption += amount;
                } else {
                    technosphere.push(Exchange {
                        input,
                        amount: *amount,
                    });
                }
            }
            ExchangeDef::Biosphere(input, amount) => {
                let input = *flow_idxs.get(input).ok_or_else(|| unknown(input))?;
                biosphere.push(Exchange {
                    input,
                    amount: *amount,
                });
            }
        }
    }

    // an activity without an explicit production exchange makes one unit:
    let production = production.unwrap_or(1.0) - self_consumption;
    if production == 0.0 {
        return Err(Error::ZeroProduction(def.key.clone()));
    }

    Ok(Activity {
        key: def.key.clone(),
        name: def.name.clone(),
        production,
        technosphere,
        biosphere,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn key(code: &str) -> Key {
        Key::new("test", code)
    }

    #[test]
    fn test_default_production_and_self_consumption() -> Result<(), Error> {
        let inv = InventoryBuilder::new()
            .activity(ActivityDef::new(key("a"), "a"))
            .activity(
                ActivityDef::new(key("b"), "b")
                    .production(2.0)
                    .technosphere(key("b"), 0.5)
                    .technosphere(key("a"), 1.0),
            )
            .build()?;

        let a = inv.activity_index(&key("a")).unwrap();
        let b = inv.lookup_activity("test", "b").unwrap();
        assert_eq!(inv.activity(a).production, 1.0);
        assert_eq!(inv.activity(b).production, 1.5);
        assert_eq!(inv.activity(b).technosphere.len(), 1);
        assert_eq!(inv.activity(b).technosphere[0].input, a);
        Ok(())
    }

    #[test]
    fn test_flow_lookup() -> Result<(), Error> {
        let co2 = Key::new("biosphere", "CO2");
        let ch4 = Key::new("biosphere", "CH4");
        let inv = InventoryBuilder::new()
            .flow(co2.clone(), "carbon dioxide")
            .flow(ch4.clone(), "methane")
            .activity(ActivityDef::new(key("a"), "a").biosphere(ch4.clone(), 2.0))
            .build()?;

        assert_eq!(inv.num_flows(), 2);
        let idx = inv.lookup_flow("biosphere", "CH4").unwrap();
        assert_eq!(inv.flow_index(&ch4), Some(idx));
        assert_eq!(inv.flow(idx).name, "methane");
        assert_eq!(inv.lookup_flow("biosphere", "N2O"), None);

        let a = inv.activity_index(&key("a")).unwrap();
        assert_eq!(inv.activity(a).biosphere[0].input, idx);
        Ok(())
    }

    #[test]
    fn test_unknown_input() {
        let err = InventoryBuilder::new()
            .activity(ActivityDef::new(key("a"), "a").technosphere(key("missing"), 1.0))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnknownInput {
                activity: key("a"),
                input: key("missing"),
            }
        );
    }

    #[test]
    fn test_flow_used_as_technosphere_input() {
        let co2 = Key::new("biosphere", "CO2");
        let err = InventoryBuilder::new()
            .flow(co2.clone(), "CO2")
            .activity(ActivityDef::new(key("a"), "a").technosphere(co2.clone(), 1.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownInput { input, .. } if input == co2));
    }

    #[test]
    fn test_duplicate_key() {
        let err = InventoryBuilder::new()
            .activity(ActivityDef::new(key("a"), "a"))
            .activity(ActivityDef::new(key("a"), "again"))
            .build()
            .unwrap_err();
        assert_eq!(err, Error::DuplicateKey(key("a")));
    }

    #[test]
    fn test_zero_production() {
        let err = InventoryBuilder::new()
            .activity(
                ActivityDef::new(key("a"), "a")
                    .production(1.0)
                    .technosphere(key("a"), 1.0),
            )
            .build()
            .unwrap_err();
        assert_eq!(err, Error::ZeroProduction(key("a")));
    }

    #[test]
    fn test_method_with_unknown_flow() {
        let err = InventoryBuilder::new()
            .method("m", [(Key::new("biosphere", "CH4"), 25.0)])
            .build()
            .unwrap_err();
        assert_eq!(err, Error::UnknownFlow(Key::new("biosphere", "CH4")));
    }
}
