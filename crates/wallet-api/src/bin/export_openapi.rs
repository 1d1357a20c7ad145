//! OpenAPI Schema Export Binary
//!
//! Prints the OpenAPI specification as JSON to stdout.
//!
//! Usage:
//!   cargo run -p wallet-api --bin export-openapi > openapi.json

use utoipa::OpenApi;
use wallet_api::openapi::ApiDoc;

fn main() {
    let openapi_json = ApiDoc::openapi()
        .to_pretty_json()
        .expect("Failed to serialize OpenAPI document to JSON");

    println!("{}", openapi_json);
}
