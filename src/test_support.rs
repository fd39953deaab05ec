//! Fixtures and a canned HTTP responder shared by the unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::models::{CatalogEntry, DetailPayload, EntityRecord, SpeciesRecord};

pub fn entry(id: u32, name: &str) -> CatalogEntry {
    CatalogEntry {
        reference_url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
        display_name: name.to_string(),
    }
}

pub fn catalog_json(names: &[&str], base: &str) -> String {
    let results: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, n)| json!({ "name": n, "url": format!("{base}/pokemon/{}/", i + 1) }))
        .collect();
    json!({ "count": names.len(), "next": null, "previous": null, "results": results }).to_string()
}

pub fn record_json(id: u32, name: &str, types: &[&str]) -> String {
    let types: Vec<_> = types
        .iter()
        .enumerate()
        .map(|(i, t)| json!({ "slot": i + 1, "type": { "name": t, "url": "" } }))
        .collect();
    let stats: Vec<_> = [
        ("hp", 45),
        ("attack", 49),
        ("defense", 49),
        ("special-attack", 65),
        ("special-defense", 65),
        ("speed", 145),
    ]
    .iter()
    .map(|(n, b)| json!({ "base_stat": b, "effort": 0, "stat": { "name": n, "url": "" } }))
    .collect();
    json!({
        "id": id,
        "name": name,
        "base_experience": 64,
        "height": 7,
        "weight": 69,
        "types": types,
        "abilities": [
            { "ability": { "name": "overgrow", "url": "" }, "is_hidden": false, "slot": 1 },
            { "ability": { "name": "chlorophyll", "url": "" }, "is_hidden": true, "slot": 3 }
        ],
        "stats": stats,
        "sprites": { "front_default": null }
    })
    .to_string()
}

pub fn species_json(entries: &[(&str, &str)]) -> String {
    let entries: Vec<_> = entries
        .iter()
        .map(|(lang, text)| {
            json!({ "flavor_text": text, "language": { "name": lang, "url": "" }, "version": { "name": "red" } })
        })
        .collect();
    json!({ "flavor_text_entries": entries }).to_string()
}

pub fn payload(id: u32, name: &str, types: &[&str]) -> DetailPayload {
    let record: EntityRecord = serde_json::from_str(&record_json(id, name, types)).unwrap();
    let species: SpeciesRecord =
        serde_json::from_str(&species_json(&[("en", "A strange seed\nwas planted.")])).unwrap();
    DetailPayload { record, species }
}

/// Serve `routes` (path with query -> (status, body)) on an ephemeral port.
/// Unknown paths answer 404 with a plain-text body. Returns the base URL.
pub async fn serve(routes: HashMap<String, (u16, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);
    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                break;
            };
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = match sock.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => n,
                    };
                    buf.extend_from_slice(&chunk[..n]);
                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let head = String::from_utf8_lossy(&buf);
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or((404, "Not Found".to_string()));
                let reply = format!(
                    "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = sock.write_all(reply.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}
