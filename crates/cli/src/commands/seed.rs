//! Demo catalog seeding.
//!
//! Writes a small catalog plus the default attribute and store settings.
//! Documents get fixed IDs, so running the command again overwrites the
//! demo data instead of duplicating it.

use serde_json::json;

use cybee_firebase::FirestoreClient;

use super::{CliError, firebase_from_env};

struct DemoProduct {
    id: &'static str,
    name: &'static str,
    price: f64,
    description: &'static str,
    category: &'static str,
    image: &'static str,
    stock: u64,
    min_stock: u64,
}

const DEMO_CATALOG: &[DemoProduct] = &[
    DemoProduct {
        id: "wildflower-honey",
        name: "Wildflower Honey",
        price: 12.50,
        description: "Raw honey from summer wildflower meadows.",
        category: "honey",
        image: "https://images.cybee.example/wildflower-honey.jpg",
        stock: 40,
        min_stock: 10,
    },
    DemoProduct {
        id: "acacia-honey",
        name: "Acacia Honey",
        price: 15.00,
        description: "Light, slow-crystallizing acacia honey.",
        category: "honey",
        image: "https://images.cybee.example/acacia-honey.jpg",
        stock: 25,
        min_stock: 10,
    },
    DemoProduct {
        id: "beeswax-candle",
        name: "Beeswax Candle",
        price: 8.00,
        description: "Hand-poured pure beeswax candle.",
        category: "candles",
        image: "https://images.cybee.example/beeswax-candle.jpg",
        stock: 60,
        min_stock: 15,
    },
    DemoProduct {
        id: "propolis-tincture",
        name: "Propolis Tincture",
        price: 9.75,
        description: "30ml propolis extract dropper bottle.",
        category: "wellness",
        image: "https://images.cybee.example/propolis-tincture.jpg",
        stock: 8,
        min_stock: 10,
    },
];

/// Seed the demo catalog and default settings.
pub async fn products() -> Result<(), CliError> {
    let config = firebase_from_env()?;
    let client = FirestoreClient::new(&config);

    for product in DEMO_CATALOG {
        let fields = json!({
            "name": product.name,
            "price": product.price,
            "description": product.description,
            "category": product.category,
            "images": [product.image],
            "stock": product.stock,
            "minStock": product.min_stock,
        });
        let serde_json::Value::Object(fields) = fields else {
            return Err(CliError::InvalidInput("demo product is not an object".to_owned()));
        };

        client.set_document("products", product.id, fields).await?;
        tracing::info!(id = product.id, "seeded product");
    }

    let attributes = json!({
        "categories": ["honey", "candles", "wellness"],
        "sizes": ["250g", "500g", "1kg"],
        "colors": ["amber", "gold", "natural"],
    });
    if let serde_json::Value::Object(fields) = attributes {
        client.set_document("settings", "attributes", fields).await?;
        tracing::info!("seeded attribute settings");
    }

    let mut store = serde_json::Map::new();
    store.insert("currency".to_owned(), serde_json::Value::String("USD".to_owned()));
    client
        .patch_document("settings", "store", store, &["currency"])
        .await?;
    tracing::info!("seeded store settings");

    Ok(())
}
