use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Room categories sold on a departure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    Quad,
    Triple,
    Double,
    Single,
}

impl RoomType {
    /// Fixed display order: Quad, Triple, Double, Single
    pub const ALL: [RoomType; 4] = [
        RoomType::Quad,
        RoomType::Triple,
        RoomType::Double,
        RoomType::Single,
    ];

    /// Occupants per room of this type
    pub fn capacity(&self) -> u32 {
        match self {
            RoomType::Quad => 4,
            RoomType::Triple => 3,
            RoomType::Double => 2,
            RoomType::Single => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoomType::Quad => "Quad",
            RoomType::Triple => "Triple",
            RoomType::Double => "Double",
            RoomType::Single => "Single",
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Requested passenger count per room type
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaxCounts {
    #[serde(default)]
    pub quad: u32,
    #[serde(default)]
    pub triple: u32,
    #[serde(default)]
    pub double: u32,
    #[serde(default)]
    pub single: u32,
}

impl PaxCounts {
    pub fn new(quad: u32, triple: u32, double: u32, single: u32) -> Self {
        Self {
            quad,
            triple,
            double,
            single,
        }
    }

    pub fn count_for(&self, room_type: RoomType) -> u32 {
        match room_type {
            RoomType::Quad => self.quad,
            RoomType::Triple => self.triple,
            RoomType::Double => self.double,
            RoomType::Single => self.single,
        }
    }

    /// Total passengers across all room types; equals the seats a booking reserves
    pub fn total(&self) -> u32 {
        self.quad + self.triple + self.double + self.single
    }
}

/// Per-occupant price per room type, supplied by the portal at booking time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceTable {
    pub per_pax: HashMap<RoomType, i64>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self {
            per_pax: HashMap::new(),
        }
    }

    pub fn with_price(mut self, room_type: RoomType, amount: i64) -> Self {
        self.per_pax.insert(room_type, amount);
        self
    }

    pub fn price_for(&self, room_type: RoomType) -> Option<i64> {
        self.per_pax.get(&room_type).copied()
    }
}
