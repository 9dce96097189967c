//! Fixed tour catalogue served by the mock
//!
//! Update these tables whenever the real backend's tour payloads change.

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: &'static str,
    pub title: &'static str,
    pub destination: &'static str,
    pub price: u32,
    pub duration_days: u32,
    pub description: &'static str,
}

pub const TOURS: &[Tour] = &[
    Tour {
        id: "T-0001",
        title: "Paris City Lights",
        destination: "Paris",
        price: 500,
        duration_days: 5,
        description: "Guided walks, river cruise and museum passes in Paris.",
    },
    Tour {
        id: "T-0002",
        title: "Punta Cana Beach Escape",
        destination: "Punta Cana",
        price: 1400,
        duration_days: 7,
        description: "All-inclusive resort stay on the Punta Cana coast.",
    },
];

pub const PAGE: u32 = 1;
pub const PAGE_SIZE: u32 = 6;

pub fn find_tour(id: &str) -> Option<&'static Tour> {
    TOURS.iter().find(|t| t.id == id)
}

impl Tour {
    /// Listing entry (no description)
    pub fn summary(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "destination": self.destination,
            "price": self.price,
        })
    }

    /// Full detail record
    pub fn detail(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "destination": self.destination,
            "price": self.price,
            "durationDays": self.duration_days,
            "description": self.description,
        })
    }
}

/// The paged listing body for `/tours/available`
pub fn available_listing() -> Value {
    let total_items = TOURS.len() as u32;
    json!({
        "page": PAGE,
        "pageSize": PAGE_SIZE,
        "totalPages": total_items.div_ceil(PAGE_SIZE),
        "totalItems": total_items,
        "tours": TOURS.iter().map(Tour::summary).collect::<Vec<_>>(),
    })
}
