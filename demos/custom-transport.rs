//! Plugs a custom transport into a `Client`.
//!
//! The transport here never touches the network: it answers every request itself, echoing back
//! the first parameter. Real transports would add headers, authenticate, or tunnel the request
//! through some other protocol.

use xmlrpc_client::{Client, Endpoint, Fault, Transport, Value};

use std::error::Error;

struct Echo;

impl Transport for Echo {
    fn transmit(&self, request: &[u8]) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
        println!("request: {}", String::from_utf8_lossy(request));

        let text = String::from_utf8(request.to_vec())?;
        let param = match (text.find("<param>"), text.find("</param>")) {
            (Some(start), Some(end)) => &text[start + "<param>".len()..end],
            _ => {
                let fault = Fault::new(1, "nothing to echo").to_value();
                let mut body = b"<?xml version=\"1.0\"?><methodResponse><fault>".to_vec();
                fault.write_as_xml(&mut body)?;
                body.extend_from_slice(b"</fault></methodResponse>");
                return Ok(body);
            }
        };

        Ok(format!(
            "<?xml version=\"1.0\"?><methodResponse><params><param>{}</param></params></methodResponse>",
            param
        )
        .into_bytes())
    }
}

fn main() {
    let endpoint = "scgi://localhost:5000/".parse::<Endpoint>().unwrap();
    let client = Client::with_transport(endpoint, Echo);

    let echoed = client.call("echo", &("hello",)).unwrap();
    assert_eq!(echoed, Value::from("hello"));
    println!("echoed: {:?}", echoed);

    let err = client.call("echo", &()).unwrap_err();
    println!("error: {}", err);
}
