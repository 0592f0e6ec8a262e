//! Built-in demo roster for the runner, benchmarks and tests

use crate::battle::{ElementType, MoveSpec, Snapshot, StatBlock, Status, Team, Unit};

fn emberfox() -> Unit {
    Unit::new("emberfox", ElementType::Fire, StatBlock::new(140, 72, 58, 92))
        .with_move(MoveSpec::new("ember", ElementType::Fire, Some(40), 100), 25)
        .with_move(
            MoveSpec::new("flame-lash", ElementType::Fire, Some(90), 85).with_effect(Status::Burn),
            10,
        )
        .with_move(MoveSpec::new("quick-jab", ElementType::Normal, Some(40), 100).with_priority(1), 20)
}

fn rivermane() -> Unit {
    Unit::new("rivermane", ElementType::Water, StatBlock::new(165, 65, 70, 60))
        .with_move(MoveSpec::new("water-gun", ElementType::Water, Some(40), 100), 25)
        .with_move(MoveSpec::new("riptide", ElementType::Water, Some(95), 80), 10)
        .with_move(MoveSpec::new("body-check", ElementType::Normal, Some(70), 100), 15)
}

fn thornback() -> Unit {
    Unit::new("thornback", ElementType::Grass, StatBlock::new(150, 68, 66, 55))
        .with_secondary_type(ElementType::Poison)
        .with_move(MoveSpec::new("razor-leaf", ElementType::Grass, Some(55), 95), 25)
        .with_move(
            MoveSpec::new("toxin-barb", ElementType::Poison, Some(50), 100).with_effect(Status::Poison),
            15,
        )
        .with_move(
            MoveSpec::new("spore-cloud", ElementType::Grass, None, 75).with_effect(Status::Sleep),
            10,
        )
}

fn boltfinch() -> Unit {
    Unit::new("boltfinch", ElementType::Electric, StatBlock::new(130, 75, 52, 105))
        .with_secondary_type(ElementType::Flying)
        .with_move(MoveSpec::new("spark", ElementType::Electric, Some(65), 100), 20)
        .with_move(
            MoveSpec::new("static-wing", ElementType::Electric, Some(80), 90)
                .with_effect(Status::Paralysis),
            10,
        )
        .with_move(MoveSpec::new("gust", ElementType::Flying, Some(40), 100), 25)
}

fn gravelhide() -> Unit {
    Unit::new("gravelhide", ElementType::Rock, StatBlock::new(180, 80, 95, 35))
        .with_secondary_type(ElementType::Ground)
        .with_move(MoveSpec::new("rock-hurl", ElementType::Rock, Some(75), 90), 15)
        .with_move(MoveSpec::new("quake-stomp", ElementType::Ground, Some(100), 100), 10)
        .with_move(MoveSpec::new("body-check", ElementType::Normal, Some(70), 100), 15)
}

fn frostmaw() -> Unit {
    Unit::new("frostmaw", ElementType::Ice, StatBlock::new(155, 70, 60, 65))
        .with_move(MoveSpec::new("ice-fang", ElementType::Ice, Some(65), 95), 15)
        .with_move(MoveSpec::new("glacier-ram", ElementType::Ice, Some(110), 70), 5)
        .with_move(MoveSpec::new("quick-jab", ElementType::Normal, Some(40), 100).with_priority(1), 20)
}

/// A balanced three-on-three starting position
pub fn demo_snapshot() -> Snapshot {
    Snapshot::new(
        Team::new(vec![emberfox(), rivermane(), thornback()]),
        Team::new(vec![boltfinch(), gravelhide(), frostmaw()]),
    )
}
