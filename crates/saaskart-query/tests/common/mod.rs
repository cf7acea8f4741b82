// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use saaskart_model::DirectorySnapshot;
use saaskart_query::{
    raw_params_from_pairs, search, CompanyStore, MemoryStore, QueryLimits, RawParams,
    SqliteStore,
};
use serde_json::json;

pub fn directory() -> DirectorySnapshot {
    serde_json::from_value(json!({
        "categories": [
            {"id": "analytics", "name": "Analytics"},
            {"id": "crm", "name": "CRM"},
            {"id": "devtools", "name": "Developer Tools"},
            {"id": "support", "name": "Support"},
            {"id": "unused", "name": "Unused"}
        ],
        "companies": [
            {
                "id": "acme", "name": "Acme Analytics",
                "description": "Product analytics for SaaS teams",
                "country": "US", "state": "CA", "city": "San Francisco",
                "year_founded": 2015, "claimed": true, "domain": "acme.io",
                "metrics": {"revenue": 5000000.0, "mrr": 400000.0, "customers": 1200.0},
                "categories": ["devtools", "analytics"]
            },
            {
                "id": "bolt", "name": "Bolt CRM",
                "description": "CRM for small businesses",
                "country": "US", "state": "NY", "city": "New York",
                "year_founded": 2018,
                "metrics": {"revenue": 2000000.0, "customers": 300.0},
                "categories": ["crm"]
            },
            {
                "id": "cirrus", "name": "Cirrus Cloud",
                "country": "DE", "state": "BE", "city": "Berlin",
                "year_founded": 2012,
                "metrics": {"revenue": 12000000.4},
                "categories": ["devtools"]
            },
            {
                "id": "delta", "name": "Delta Billing",
                "description": "Billing 100% automated",
                "country": "GB", "city": "London",
                "year_founded": 2020,
                "metrics": {"mrr": 10000.0}
            },
            {
                "id": "echo", "name": "Echo Support",
                "country": "US", "state": "CA", "city": "Los Angeles",
                "year_founded": 2015,
                "metrics": {"revenue": 500.5},
                "categories": ["support", "crm"]
            },
            {
                "id": "foxtrot", "name": "Foxtrot HR"
            }
        ]
    }))
    .expect("fixture snapshot")
}

/// Thirty companies with distinct revenues, for limit checks.
pub fn large_directory() -> DirectorySnapshot {
    let companies: Vec<serde_json::Value> = (0..30)
        .map(|i| {
            json!({
                "id": format!("co-{i:02}"),
                "name": format!("Company {i:02}"),
                "metrics": {"revenue": f64::from(i) * 1000.0}
            })
        })
        .collect();
    serde_json::from_value(json!({ "companies": companies })).expect("large snapshot")
}

pub fn sqlite_store(snapshot: &DirectorySnapshot) -> SqliteStore {
    let mut store = SqliteStore::open_in_memory().expect("open memory db");
    store.init_schema().expect("schema");
    store.import_snapshot(snapshot).expect("import");
    store
}

pub fn stores_for(snapshot: DirectorySnapshot) -> Vec<(&'static str, Box<dyn CompanyStore>)> {
    let sqlite = sqlite_store(&snapshot);
    let memory = MemoryStore::from_snapshot(snapshot).expect("memory store");
    vec![("sqlite", Box::new(sqlite)), ("memory", Box::new(memory))]
}

pub fn stores() -> Vec<(&'static str, Box<dyn CompanyStore>)> {
    stores_for(directory())
}

pub fn params(pairs: &[(&str, &str)]) -> RawParams {
    raw_params_from_pairs(pairs.iter().copied())
}

pub fn ids(store: &dyn CompanyStore, pairs: &[(&str, &str)]) -> Vec<String> {
    search(store, &params(pairs), &QueryLimits::default())
        .expect("search")
        .companies
        .into_iter()
        .map(|r| r.company.id.as_str().to_string())
        .collect()
}
