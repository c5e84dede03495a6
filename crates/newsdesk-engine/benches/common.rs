// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use serde_json::{Value, json};

/// A raw article body with `sections` repetitions of a typical news layout.
#[allow(dead_code)]
pub fn generate_article(sections: usize) -> Value {
    let blocks: Vec<Value> = (0..sections)
        .flat_map(|i| {
            [
                json!({ "id": format!("h{i}"), "type": "header", "data": { "text": format!("Section {i}"), "level": 2 } }),
                json!({
                    "id": format!("p{i}"),
                    "type": "paragraph",
                    "data": { "text": "Reporting from the scene, <b>officials</b> confirmed the <i>latest</i> figures." },
                    "tunes": { "highlight": { "highlighted": i % 3 == 0 } }
                }),
                json!({ "type": "list", "data": { "style": "unordered", "items": ["First point", "Second point", "Third point"] } }),
                json!({ "type": "quote", "data": { "text": "We are monitoring the situation.", "caption": "Spokesperson" } }),
                json!({ "type": "image", "data": { "file": { "url": format!("https://cdn.example.com/{i}.jpg") }, "caption": "On site" } }),
                json!({ "type": "video", "data": { "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ" } }),
                json!({ "type": "table", "data": { "content": [["a", "b"]] } }),
            ]
        })
        .collect();

    json!({ "time": 1718000000000_i64, "blocks": blocks, "version": "2.31.0" })
}

/// The same body as JSON text, the way it comes out of the article store.
#[allow(dead_code)]
pub fn generate_article_text(sections: usize) -> String {
    generate_article(sections).to_string()
}
