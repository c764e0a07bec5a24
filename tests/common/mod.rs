//! In-process mock JSON-RPC nodes shared by the integration tests.
#![allow(dead_code)]

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use latest_block::config::Config;
use latest_block::error::ApplicationError;
use latest_block::rpc::RpcRequest;
use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Clone, Debug)]
pub enum Behavior {
    Block(Value),
    Status(StatusCode),
    RawBody(&'static str),
    Reply(Value),
    Stall(Duration),
}

pub struct MockNode {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl MockNode {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub async fn spawn_node(behavior: Behavior) -> MockNode {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let hits_filter = warp::any().map(move || Arc::clone(&counter));
    let behavior_filter = warp::any().map(move || behavior.clone());

    let rpc = warp::path::end()
        .and(warp::post())
        .and(warp::body::json())
        .and(hits_filter)
        .and(behavior_filter)
        .and_then(handle_rpc);

    let (addr, server) = warp::serve(rpc).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    MockNode {
        url: format!("http://{addr}"),
        hits,
    }
}

async fn handle_rpc(
    req: RpcRequest,
    hits: Arc<AtomicUsize>,
    behavior: Behavior,
) -> Result<warp::reply::Response, Infallible> {
    hits.fetch_add(1, Ordering::SeqCst);

    if req != RpcRequest::latest_block() {
        return Ok(warp::reply::json(&json!({
            "jsonrpc": "2.0",
            "error": {"code": -32602, "message": "Invalid params"},
            "id": req.id,
        }))
        .into_response());
    }

    let response = match behavior {
        Behavior::Block(block) => rpc_result(block, req.id),
        Behavior::Status(status) => {
            warp::reply::with_status(warp::reply::json(&json!({})), status).into_response()
        }
        Behavior::RawBody(body) => body.into_response(),
        Behavior::Reply(reply) => warp::reply::json(&reply).into_response(),
        Behavior::Stall(delay) => {
            tokio::time::sleep(delay).await;
            rpc_result(sample_block(), req.id)
        }
    };
    Ok(response)
}

fn rpc_result(result: Value, id: Value) -> warp::reply::Response {
    warp::reply::json(&json!({"jsonrpc": "2.0", "result": result, "id": id})).into_response()
}

pub fn sample_block() -> Value {
    json!({
        "number": "0x112a880",
        "hash": "0x3c1bb7c4e5b0c4ef2d0b8a5e7e1e2b3cd4a5f60718293a4b5c6d7e8f90a1b2c3",
        "timestamp": "0x5f5e100",
        "gasUsed": "0x1c9c380",
        "gasLimit": "0x1c9c380",
        "miner": "0x4838b106fce9647bdf1e7877bf73ce8b0bad5f97",
        "parentHash": "0x9d2c2a4f1e6b7c8d0e1f2a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f",
        "transactions": []
    })
}

pub fn no_result_reply() -> Value {
    json!({
        "jsonrpc": "2.0",
        "error": {"code": -32005, "message": "rate limited"},
        "id": 1
    })
}

pub fn config_for(nodes: &[&MockNode]) -> Config {
    Config {
        endpoints: nodes.iter().map(|n| n.url.clone()).collect(),
        ..Config::default()
    }
}

pub async fn run_to_string(config: &Config) -> (Result<(), ApplicationError>, String) {
    let mut out = Vec::new();
    let result = latest_block::run(config, &mut out).await;
    (result, String::from_utf8(out).unwrap())
}
