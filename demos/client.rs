//! You can use this example by executing `python3 -m xmlrpc.server` and then running
//! `cargo run --example client`.
//!
//! Pass a different address as the first argument to talk to another server, e.g.
//! `cargo run --example client -- scgi://127.0.0.1:5000/RPC2`.

use xmlrpc_client::{Client, Value};

use std::env;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let address = env::args().nth(1).unwrap_or_else(|| "http://127.0.0.1:8000".to_string());
    let client = Client::new(&address, false).unwrap();

    // The Python example server exports Python's `pow` method. Let's call it!
    let result = client.call("pow", &(2, 8)); // Compute 2**8

    println!("Result: {:?}", result);

    match result {
        Ok(pow) => assert_eq!(pow, Value::Int(2i32.pow(8))),
        Err(e) => match e.fault() {
            Some(fault) => eprintln!("server returned fault {}: {}", fault.code(), fault.string()),
            None => eprintln!("call failed: {}", e),
        },
    }
}
