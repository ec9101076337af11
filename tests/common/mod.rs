#![allow(dead_code)]

use lci_graph::{ActivityDef, Inventory, InventoryBuilder, Key};

pub const METHOD: &str = "a method";

/// Compare floats with an absolute tolerance.
macro_rules! assert_close {
    ($left:expr, $right:expr) => {
        assert_close!($left, $right, "")
    };
    ($left:expr, $right:expr, $($ctx:tt)*) => {{
        let (l, r): (f64, f64) = ($left, $right);
        assert!(
            (l - r).abs() < 1e-9,
            "{} != {} {}",
            l,
            r,
            format!($($ctx)*)
        );
    }};
}

pub fn init_logging() {
    simple_logging::log_to_stderr(log::LevelFilter::Trace);
}

pub fn test_key(code: &str) -> Key {
    Key::new("test", code)
}

pub fn co2() -> Key {
    Key::new("biosphere", "CO2")
}

/// A -> B -> C -> D -> CO2, with non-unitary and negative production amounts.
pub fn no_loops() -> Inventory {
    InventoryBuilder::new()
        .flow(co2(), "an emission")
        .activity(
            ActivityDef::new(test_key("A"), "A")
                .production(-1.0)
                .technosphere(test_key("B"), -1.0),
        )
        .activity(
            ActivityDef::new(test_key("B"), "B")
                .production(-2.0)
                .technosphere(test_key("C"), 1.0),
        )
        .activity(
            ActivityDef::new(test_key("C"), "C")
                .production(1.0)
                .technosphere(test_key("D"), -1.0),
        )
        .activity(
            ActivityDef::new(test_key("D"), "D")
                .production(-1.0)
                .biosphere(co2(), -1.0),
        )
        .method(METHOD, [(co2(), 1.0)])
        .build()
        .unwrap()
}

/// Steel production: coal mining (A), steel smelting (B), electricity (C),
/// iron ore mining (D) and hot rolling (E), with several loops through E.
pub fn incl_loops() -> Inventory {
    InventoryBuilder::new()
        .flow(co2(), "an emission")
        .activity(
            ActivityDef::new(test_key("A"), "coal mining")
                .biosphere(co2(), 0.05)
                .production(1.0)
                .technosphere(test_key("E"), 0.1),
        )
        .activity(
            ActivityDef::new(test_key("B"), "steel smelting")
                .biosphere(co2(), 1.1)
                .production(1.0)
                .technosphere(test_key("A"), 1.0)
                .technosphere(test_key("C"), 0.5)
                .technosphere(test_key("D"), 2.0),
        )
        .activity(
            ActivityDef::new(test_key("C"), "electricity production")
                .biosphere(co2(), 1.0)
                .production(1.0)
                .technosphere(test_key("A"), 1.0),
        )
        .activity(
            ActivityDef::new(test_key("D"), "iron ore mining")
                .production(1.0)
                .technosphere(test_key("C"), 0.5)
                .technosphere(test_key("E"), 0.1),
        )
        .activity(
            ActivityDef::new(test_key("E"), "hot-rolling")
                .biosphere(co2(), 0.1)
                .production(1.0)
                .technosphere(test_key("C"), 0.5)
                .technosphere(test_key("B"), 1.0),
        )
        .method(METHOD, [(co2(), 1.0)])
        .build()
        .unwrap()
}

/// X needs 2 Y and 1 Z; both Y and Z need W, which emits CO2.
pub fn diamond() -> Inventory {
    InventoryBuilder::new()
        .flow(co2(), "an emission")
        .activity(
            ActivityDef::new(test_key("X"), "X")
                .technosphere(test_key("Y"), 2.0)
                .technosphere(test_key("Z"), 1.0),
        )
        .activity(
            ActivityDef::new(test_key("Y"), "Y")
                .production(2.0)
                .technosphere(test_key("W"), 1.0)
                .biosphere(co2(), 0.5),
        )
        .activity(ActivityDef::new(test_key("Z"), "Z").technosphere(test_key("W"), 3.0))
        .activity(ActivityDef::new(test_key("W"), "W").biosphere(co2(), 1.0))
        .method(METHOD, [(co2(), 1.0)])
        .build()
        .unwrap()
}

/// Two unconnected activities producing 2 and 4 units per unit of level.
pub fn nonunitary() -> Inventory {
    let bio = Key::new("bio", "a");
    InventoryBuilder::new()
        .flow(bio.clone(), "a")
        .activity(
            ActivityDef::new(Key::new("t", "1"), "1")
                .biosphere(bio.clone(), 0.5)
                .production(2.0),
        )
        .activity(
            ActivityDef::new(Key::new("t", "2"), "2")
                .biosphere(bio.clone(), 1.0)
                .production(4.0),
        )
        .method("test", [(bio, 2.0)])
        .build()
        .unwrap()
}
