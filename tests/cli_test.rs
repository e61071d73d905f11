//! CLI integration tests for swagger-markdown binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("swagger-markdown"))
}

// Helper to create a temp input file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const USERS: &str = r##"{
    "swagger": "2.0",
    "info": { "title": "User service", "version": "1.0.0", "description": "accounts" },
    "paths": {
        "/api/user/query": {
            "get": {
                "summary": "Query user",
                "parameters": [{ "name": "id", "in": "query", "type": "string", "required": true }],
                "responses": { "200": { "schema": { "$ref": "#/definitions/User" } } }
            }
        },
        "/api/user/register": {
            "post": {
                "summary": "Register user",
                "parameters": [{ "name": "body", "in": "body", "schema": { "$ref": "#/definitions/UserRegister" } }]
            }
        }
    },
    "definitions": {
        "UserRegister": {
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": { "type": "string" },
                "_app_id": { "type": "string" }
            }
        },
        "User": {
            "properties": {
                "id": { "type": "string" },
                "roles": { "type": "array", "items": { "$ref": "#/definitions/Role" } }
            }
        },
        "Role": { "properties": { "code": { "type": "string" } } }
    }
}"##;

mod generate_command {
    use super::*;

    #[test]
    fn generate_to_stdout() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(&dir, "users.json", USERS);

        cmd()
            .args(["generate", source.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("# User service"))
            .stdout(predicate::str::contains("### Register user"))
            .stdout(predicate::str::contains("| name | `string` | Yes |  |"))
            .stdout(predicate::str::contains("| roles | `[]Role` |  |"));
    }

    #[test]
    fn generate_with_output_file() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(&dir, "users.json", USERS);
        let output = dir.path().join("users.md");

        cmd()
            .args([
                "generate",
                source.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let report = fs::read_to_string(&output).unwrap();
        assert!(report.contains("**Version**: 1.0.0"));
        assert!(report.contains("### Query user"));
    }

    #[test]
    fn generate_default_order_is_lexical() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(&dir, "users.json", USERS);

        let output = cmd()
            .args(["generate", source.to_str().unwrap()])
            .output()
            .unwrap();
        let report = String::from_utf8(output.stdout).unwrap();

        let query = report.find("### Query user").unwrap();
        let register = report.find("### Register user").unwrap();
        assert!(query < register);
    }

    #[test]
    fn generate_with_order_and_ignore() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(&dir, "users.json", USERS);

        let output = cmd()
            .args([
                "generate",
                source.to_str().unwrap(),
                "--order",
                "/api/user/register=1",
                "--ignore",
                "_app_id",
            ])
            .output()
            .unwrap();
        assert!(output.status.success());
        let report = String::from_utf8(output.stdout).unwrap();

        let query = report.find("### Query user").unwrap();
        let register = report.find("### Register user").unwrap();
        assert!(register < query);
        assert!(!report.contains("_app_id"));
    }

    #[test]
    fn generate_with_config_file() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(&dir, "users.json", USERS);
        let config = write_temp_file(
            &dir,
            "report.yaml",
            "order:\n  /api/user/register: 1\nignore:\n  - _app_id\nlanguage: zh\n",
        );

        cmd()
            .args([
                "generate",
                source.to_str().unwrap(),
                "--config",
                config.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("## 接口概览"))
            .stdout(predicate::str::contains("| name | `string` | 是 |  |"))
            .stdout(predicate::str::contains("_app_id").not());
    }

    #[test]
    fn flags_override_config_language() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(&dir, "users.json", USERS);
        let config = write_temp_file(&dir, "report.json", r#"{"language": "zh"}"#);

        cmd()
            .args([
                "generate",
                source.to_str().unwrap(),
                "--config",
                config.to_str().unwrap(),
                "--lang",
                "en",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("## Overview"));
    }

    #[test]
    fn generate_chinese_labels() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(&dir, "users.json", USERS);

        cmd()
            .args(["generate", source.to_str().unwrap(), "--lang", "zh"])
            .assert()
            .success()
            .stdout(predicate::str::contains("**请求方式**: `POST`"));
    }

    #[test]
    fn generate_yaml_source() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(
            &dir,
            "pets.yaml",
            r##"
info:
  title: Pets
paths:
  /pets:
    get:
      summary: List pets
      responses:
        200:
          schema:
            $ref: "#/definitions/Pet"
definitions:
  Pet:
    properties:
      name:
        type: string
"##,
        );

        cmd()
            .args(["generate", source.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("# Pets"))
            .stdout(predicate::str::contains("| name | `string` |  |"));
    }
}

mod check_command {
    use super::*;

    #[test]
    fn check_clean_document() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(&dir, "users.json", USERS);

        cmd()
            .args(["check", source.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("passed"));
    }

    #[test]
    fn check_warns_on_unresolvable_reference() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(
            &dir,
            "ghost.json",
            r##"{
                "paths": { "/g": { "post": {
                    "parameters": [{ "name": "body", "in": "body", "schema": { "$ref": "#/definitions/Ghost" } }]
                } } }
            }"##,
        );

        cmd()
            .args(["check", source.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("W001"))
            .stdout(predicate::str::contains("#/definitions/Ghost"));

        cmd()
            .args(["check", source.to_str().unwrap(), "--strict"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("failed"));
    }

    #[test]
    fn check_fails_on_composite_cycle() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(
            &dir,
            "cycle.json",
            r##"{
                "definitions": {
                    "A": { "allOf": [{ "$ref": "#/definitions/B" }] },
                    "B": { "allOf": [{ "$ref": "#/definitions/A" }] }
                }
            }"##,
        );

        cmd()
            .args(["check", source.to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("E002"));
    }

    #[test]
    fn check_json_output() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(&dir, "bad.json", "{ not valid json");

        let output = cmd()
            .args(["check", source.to_str().unwrap(), "--format", "json"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));

        let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(result["errors"], 1);
        assert_eq!(result["diagnostics"][0]["code"], "E001");
        assert_eq!(result["diagnostics"][0]["severity"], "error");
    }

    #[test]
    fn check_missing_file() {
        cmd()
            .args(["check", "/nonexistent/swagger.json"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("not found"));
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn file_not_found() {
        cmd()
            .args(["generate", "/nonexistent/swagger.json"])
            .assert()
            .code(3)
            .stderr(
                predicate::str::contains("not found").or(predicate::str::contains("No such file")),
            );
    }

    #[test]
    fn invalid_json_document() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(&dir, "bad.json", r#"{ not valid json"#);

        cmd()
            .args(["generate", source.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("JSON"));
    }

    #[test]
    fn invalid_json_leaves_output_untouched() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(&dir, "bad.json", r#"{ "paths": "#);
        let output = write_temp_file(&dir, "report.md", "previous");

        cmd()
            .args([
                "generate",
                source.to_str().unwrap(),
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .code(2);

        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    }

    #[test]
    fn bad_order_value() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(&dir, "users.json", USERS);

        cmd()
            .args([
                "generate",
                source.to_str().unwrap(),
                "--order",
                "/api/user/register",
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("PATH=PRIORITY"));
    }

    #[test]
    fn unknown_language() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(&dir, "users.json", USERS);

        cmd()
            .args(["generate", source.to_str().unwrap(), "--lang", "fr"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unknown language"));
    }

    #[test]
    fn invalid_config_file() {
        let dir = TempDir::new().unwrap();
        let source = write_temp_file(&dir, "users.json", USERS);
        let config = write_temp_file(&dir, "report.json", r#"{"order": "first"}"#);

        cmd()
            .args([
                "generate",
                source.to_str().unwrap(),
                "--config",
                config.to_str().unwrap(),
            ])
            .assert()
            .code(2);
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Markdown"));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("swagger-markdown"));
    }

    #[test]
    fn generate_help() {
        cmd()
            .args(["generate", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--order"))
            .stdout(predicate::str::contains("--ignore"));
    }

    #[test]
    fn missing_source() {
        cmd().arg("generate").assert().failure();
    }
}
