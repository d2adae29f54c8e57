//! Shared helpers: start a server on an ephemeral port with a chosen adapter

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use posturepal_api_http::{HttpServer, HttpServerConfig, ServerHandle};
use posturepal_core::port::ModelAdapter;
use posturepal_infra_model::LinearModelAdapter;
use serde_json::{json, Value};

pub struct TestServer {
    pub base_url: String,
    pub handle: ServerHandle,
}

pub fn test_config() -> HttpServerConfig {
    HttpServerConfig {
        port: 0,
        ..Default::default()
    }
}

pub async fn spawn_with(config: HttpServerConfig, adapter: Arc<dyn ModelAdapter>) -> TestServer {
    let handle = HttpServer::new(config, adapter)
        .start()
        .await
        .expect("server should start");
    let base_url = format!("http://{}", handle.local_addr());

    TestServer { base_url, handle }
}

pub async fn spawn(adapter: Arc<dyn ModelAdapter>) -> TestServer {
    spawn_with(test_config(), adapter).await
}

pub fn bundled_model() -> LinearModelAdapter {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../models");
    LinearModelAdapter::load(root.join("posture_model.json"), root.join("meta.json"))
        .expect("bundled model should load")
}

/// The upright-sitting reference vector
pub fn upright_body() -> Value {
    json!({
        "torso_angle": 10.0,
        "neck_angle": 5.0,
        "shoulder_tilt": 0.0,
        "hip_tilt": 0.0,
        "head_forward_z": 2.0,
        "head_to_shoulder": 1.0
    })
}
