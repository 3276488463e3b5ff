/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use fs_err as fs;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use smithy_error_build::subcommand::build::{subcommand_build, BuildArgs};
use smithy_error_build::subcommand::map::{subcommand_map, MapArgs};
use smithy_error_build::subcommand::transform::{subcommand_transform, TransformArgs};
use smithy_error_build::subcommand::validate::{subcommand_validate, ValidateArgs};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn demo_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos/example-service")
}

fn demo_model() -> PathBuf {
    demo_dir().join("model")
}

fn build_demo(output_dir: &Path) {
    subcommand_build(&BuildArgs {
        config: demo_dir().join("smithy-build.json"),
        output_dir: output_dir.to_path_buf(),
    })
    .unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn read_tree(dir: &Path) -> Vec<(String, String)> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(next) = pending.pop() {
        for entry in fs::read_dir(&next).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                let relative = path.strip_prefix(dir).unwrap().to_string_lossy().into_owned();
                files.push((relative, fs::read_to_string(&path).unwrap()));
            }
        }
    }
    files.sort();
    files
}

#[test]
fn validate_demo_model() {
    subcommand_validate(&ValidateArgs {
        models: vec![demo_model()],
    })
    .unwrap();
}

#[test]
fn validate_reports_violations() {
    let tmp_dir = TempDir::new().unwrap();
    let model_path = tmp_dir.path().join("broken.json");
    fs::write(
        &model_path,
        json!({
            "smithy": "2.0",
            "shapes": {
                "com.example#Oops": {
                    "type": "structure",
                    "members": {
                        "code": {
                            "target": "smithy.api#String",
                            "traits": {"smithy.api#default": "A", "com.example#const": "B"}
                        }
                    },
                    "traits": {"smithy.api#error": "client", "com.example#errorExample": []}
                }
            }
        })
        .to_string(),
    )
    .unwrap();
    let err = subcommand_validate(&ValidateArgs {
        models: vec![model_path],
    })
    .unwrap_err();
    assert_eq!(err.to_string(), "model validation failed with 2 error(s)");
}

#[test]
fn build_writes_every_artifact() {
    let tmp_dir = TempDir::new().unwrap();
    build_demo(tmp_dir.path());

    let paths: Vec<String> = read_tree(tmp_dir.path()).into_iter().map(|(path, _)| path).collect();
    assert_eq!(
        paths,
        vec![
            "BankService.openapi.json",
            "errors/access_denied.rs",
            "errors/account_suspended.rs",
            "errors/internal_server_error.rs",
            "errors/mod.rs",
            "errors/transfer_limit_exceeded.rs",
            "errors/types.rs",
            "errors/validation_problem.rs",
        ]
    );

    let document = read_json(&tmp_dir.path().join("BankService.openapi.json"));
    assert_eq!(document["openapi"], json!("3.1.0"));
    assert_eq!(document["info"]["title"], json!("BankService"));

    let create = &document["paths"]["/accounts/{accountId}/transfers"]["post"];
    let codes: Vec<&String> = create["responses"].as_object().unwrap().keys().collect();
    assert_eq!(codes, vec!["201", "400", "403", "422", "500"]);

    let conflict = &create["responses"]["422"]["content"]["application/json"];
    assert_eq!(
        conflict["schema"],
        json!({"$ref": "#/components/schemas/CreateTransfer422ErrorResponseContent"})
    );
    assert_eq!(
        conflict["examples"],
        json!({
            "AccountSuspended": {"$ref": "#/components/examples/AccountSuspended"},
            "TransferLimitExceeded": {"$ref": "#/components/examples/TransferLimitExceeded"}
        })
    );
    assert_eq!(
        create["responses"]["500"]["content"]["application/json"]["examples"],
        json!({
            "InternalServerError": {"$ref": "#/components/examples/InternalServerError"},
            "InternalServerError1": {"$ref": "#/components/examples/InternalServerErrorExample1"},
            "InternalServerError2": {"$ref": "#/components/examples/InternalServerErrorExample2"}
        })
    );

    let schemas = &document["components"]["schemas"];
    assert_eq!(
        schemas["ValidationProblemResponseContent"]["properties"]["status"],
        json!({"type": "integer", "format": "int32", "const": 400})
    );
    assert_eq!(
        schemas["CreateTransfer422ErrorResponseContent"],
        json!({"oneOf": [
            {"$ref": "#/components/schemas/AccountSuspendedResponseContent"},
            {"$ref": "#/components/schemas/TransferLimitExceededResponseContent"}
        ]})
    );
    assert_eq!(
        document["components"]["examples"]["ValidationProblem"],
        json!({
            "summary": "ValidationProblem",
            "value": {
                "detail": "amount must be positive",
                "fieldErrors": [{"field": "amount", "message": "must be positive"}],
                "status": 400,
                "title": "Validation failed",
                "type": "https://example.com/problems/validation"
            }
        })
    );

    let access_denied = fs::read_to_string(tmp_dir.path().join("errors/access_denied.rs")).unwrap();
    assert!(access_denied.contains("pub struct AccessDenied {"));
    assert!(access_denied.contains("    pub message: String,"));
    assert!(access_denied.contains("    pub const STATUS_CODE: u16 = 403;"));
    let internal = fs::read_to_string(tmp_dir.path().join("errors/internal_server_error.rs")).unwrap();
    assert!(internal.contains("    pub const STATUS_CODE: u16 = 500;"));
    assert!(internal.contains("    pub const ERROR_KIND: ErrorKind = ErrorKind::Server;"));
    let types = fs::read_to_string(tmp_dir.path().join("errors/types.rs")).unwrap();
    assert!(types.contains("pub struct FieldError {"));
    assert!(types.contains("pub struct LimitAttributes {"));
}

#[test]
fn build_is_deterministic() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    build_demo(first.path());
    build_demo(second.path());
    assert_eq!(read_tree(first.path()), read_tree(second.path()));
}

#[test]
fn transform_is_idempotent() {
    let tmp_dir = TempDir::new().unwrap();
    let once = tmp_dir.path().join("once.json");
    let twice = tmp_dir.path().join("twice.json");
    let config = Some(demo_dir().join("smithy-build.json"));
    subcommand_transform(&TransformArgs {
        models: vec![demo_model()],
        config: config.clone(),
        output: once.clone(),
    })
    .unwrap();
    subcommand_transform(&TransformArgs {
        models: vec![once.clone()],
        config,
        output: twice.clone(),
    })
    .unwrap();

    let transformed = read_json(&once);
    let wrapper = &transformed["shapes"]["com.example#CreateTransfer422Error"];
    assert_eq!(wrapper["traits"]["smithy.api#httpError"], json!(422));
    assert_eq!(
        transformed["shapes"]["com.example#InternalServerError"]["traits"]["smithy.api#httpError"],
        json!(500)
    );
    assert_eq!(
        fs::read_to_string(&once).unwrap(),
        fs::read_to_string(&twice).unwrap()
    );
}

#[test]
fn map_existing_document() {
    let tmp_dir = TempDir::new().unwrap();
    let input = tmp_dir.path().join("openapi.json");
    let output = tmp_dir.path().join("mapped.json");
    fs::write(
        &input,
        json!({
            "openapi": "3.0.2",
            "paths": {
                "/accounts/{accountId}": {
                    "get": {
                        "responses": {
                            "200": {"description": "ok"},
                            "422": {
                                "description": "AccountSuspended 422 response",
                                "content": {"application/json": {"schema": {
                                    "$ref": "#/components/schemas/AccountSuspendedResponseContent"
                                }}}
                            }
                        }
                    }
                }
            },
            "components": {"schemas": {"AccountSuspendedResponseContent": {
                "type": "object",
                "properties": {
                    "title": {"type": "string", "default": "Account suspended"},
                    "reason": {"type": "string"}
                }
            }}}
        })
        .to_string(),
    )
    .unwrap();

    subcommand_map(&MapArgs {
        models: vec![demo_model()],
        service: "com.example#BankService".parse().unwrap(),
        input,
        output: output.clone(),
    })
    .unwrap();

    let mapped = read_json(&output);
    assert_eq!(mapped["openapi"], json!("3.0.2"));
    assert_eq!(
        mapped["components"]["schemas"]["AccountSuspendedResponseContent"]["properties"]["title"],
        json!({"type": "string", "const": "Account suspended"})
    );
    assert_eq!(
        mapped["paths"]["/accounts/{accountId}"]["get"]["responses"]["422"]["content"]
            ["application/json"]["examples"],
        json!({"AccountSuspended": {"$ref": "#/components/examples/AccountSuspended"}})
    );
    assert_eq!(
        mapped["components"]["examples"]["AccountSuspendedExample"]["description"],
        json!("The account is under fraud review.")
    );
}
