use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stdout_json};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(test.root().join(".intlrc.json").exists());

    let content = test.read_file(".intlrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["library"], "svelte-i18n");
    assert_eq!(parsed["defineMessages"], "defineMessages");
    assert!(parsed.get("formatFunctions").is_some());
    assert!(parsed.get("extensions").is_some());
    assert!(content.contains("\n  \""), "Config should use 2-space indentation");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".intlrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
    assert_eq!(test.read_file(".intlrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_file(
        "src/App.svelte",
        "<script>import { _ } from 'svelte-i18n';</script>\n<p>{$_('hello')}</p>\n",
    )?;

    let output = test.extract_command().arg("src/**/*.svelte").output()?;
    assert!(
        output.status.success(),
        "extract should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(stdout_json(&output)?, serde_json::json!({ "hello": "" }));

    Ok(())
}
