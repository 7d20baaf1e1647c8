use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, stderr, stdout_json};

const HEADER: &str = r#"<script>
  import { _, defineMessages } from 'svelte-i18n';
  const messages = defineMessages({
    title: { id: 'page.title', default: 'Home' },
    subtitle: { id: 'page.subtitle' },
  });
</script>
"#;

fn component(markup: &str) -> String {
    format!("{HEADER}{markup}\n")
}

#[test]
fn test_extract_to_stdout() -> Result<()> {
    let test = CliTest::with_file(
        "src/routes/Home.svelte",
        &component(r#"<h1>{$_('page.heading', { default: 'Welcome' })}</h1>"#),
    )?;

    let output = test.extract_command().arg("src/**/*.svelte").output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout_json(&output)?,
        json!({
            "page": { "title": "Home", "subtitle": "", "heading": "Welcome" }
        })
    );

    Ok(())
}

#[test]
fn test_extract_shallow_keys() -> Result<()> {
    let test = CliTest::with_file(
        "src/Home.svelte",
        &component(r#"<button title={$_('page.cta')}>x</button>"#),
    )?;

    let output = test
        .extract_command()
        .args(["src/*.svelte", "--shallow"])
        .output()?;

    assert_eq!(
        stdout_json(&output)?,
        json!({ "page.title": "Home", "page.subtitle": "", "page.cta": "" })
    );

    Ok(())
}

#[test]
fn test_extract_writes_output_file() -> Result<()> {
    let test = CliTest::with_file("src/Home.svelte", &component(""))?;

    let output = test
        .extract_command()
        .args(["src/*.svelte", "locales/en.json"])
        .output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(output.stdout.is_empty());
    assert_eq!(
        test.read_file("locales/en.json")?,
        "{\n  \"page\": {\n    \"title\": \"Home\",\n    \"subtitle\": \"\"\n  }\n}\n"
    );
    assert!(stderr(&output).contains("Extracted 2 new messages from 1 file"));

    Ok(())
}

#[test]
fn test_existing_output_entries_win() -> Result<()> {
    let test = CliTest::with_file("src/Home.svelte", &component(""))?;
    test.write_file("en.json", r#"{ "page": { "title": "Start" }, "kept": "yes" }"#)?;

    test.extract_command()
        .args(["src/*.svelte", "en.json"])
        .output()?;

    assert_eq!(
        test.read_json("en.json")?,
        json!({ "page": { "title": "Start", "subtitle": "" }, "kept": "yes" })
    );

    Ok(())
}

#[test]
fn test_overwrite_ignores_existing_output() -> Result<()> {
    let test = CliTest::with_file("src/Home.svelte", &component(""))?;
    test.write_file("en.json", r#"{ "page": { "title": "Start" }, "stale": "x" }"#)?;

    test.extract_command()
        .args(["src/*.svelte", "en.json", "--overwrite"])
        .output()?;

    assert_eq!(
        test.read_json("en.json")?,
        json!({ "page": { "title": "Home", "subtitle": "" } })
    );

    Ok(())
}

#[test]
fn test_first_file_in_sorted_order_wins() -> Result<()> {
    let test = CliTest::new()?;
    let call = |default: &str| {
        format!(
            "<script>import {{ t }} from 'svelte-i18n';</script>\n{{$t('shared', {{ default: '{default}' }})}}\n"
        )
    };
    test.write_file("src/b/Second.svelte", &call("from b"))?;
    test.write_file("src/a/First.svelte", &call("from a"))?;

    let output = test.extract_command().arg("src/**/*.svelte").output()?;

    assert_eq!(stdout_json(&output)?, json!({ "shared": "from a" }));

    Ok(())
}

#[test]
fn test_parse_error_is_skipped_with_exit_code_one() -> Result<()> {
    let test = CliTest::with_file("src/Good.svelte", &component(""))?;
    test.write_file("src/Broken.svelte", "<p>{$_('never'</p>\n")?;

    let output = test.extract_command().arg("src/*.svelte").output()?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout_json(&output)?,
        json!({ "page": { "title": "Home", "subtitle": "" } })
    );
    assert!(stderr(&output).contains("1 file could not be parsed"));

    Ok(())
}

#[test]
fn test_verbose_reports_parse_error_details() -> Result<()> {
    let test = CliTest::with_file("src/Broken.svelte", "<p>{oops</p>\n")?;

    let output = test
        .extract_command()
        .args(["src/*.svelte", "-v"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Broken.svelte"), "stderr: {}", err);
    assert!(err.contains("Note: No .intlrc.json found"), "stderr: {}", err);

    Ok(())
}

#[test]
fn test_spread_in_catalog_is_fatal() -> Result<()> {
    let test = CliTest::with_file(
        "src/Bad.svelte",
        "<script>\n  import { defineMessages } from 'svelte-i18n';\n  defineMessages({ ...shared });\n</script>\n",
    )?;

    let output = test
        .extract_command()
        .args(["src/*.svelte", "en.json"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("Failed to extract messages from"), "stderr: {}", err);
    assert!(err.contains("Found invalid 'SpreadElement' at L3:19"), "stderr: {}", err);
    assert!(!test.root().join("en.json").exists());

    Ok(())
}

#[test]
fn test_invalid_existing_output_is_fatal() -> Result<()> {
    let test = CliTest::with_file("src/Home.svelte", &component(""))?;
    test.write_file("en.json", "[]")?;

    let output = test
        .extract_command()
        .args(["src/*.svelte", "en.json"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("must be an object"));
    assert_eq!(test.read_file("en.json")?, "[]");

    Ok(())
}

#[test]
fn test_config_ignores_and_library() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".intlrc.json",
        r#"{ "library": "@acme/intl", "ignores": ["**/legacy/**"] }"#,
    )?;
    test.write_file(
        "src/App.svelte",
        "<script>import { _ } from '@acme/intl';</script>\n{$_('app.name')}\n",
    )?;
    test.write_file(
        "src/legacy/Old.svelte",
        "<script>import { _ } from '@acme/intl';</script>\n{$_('old.name')}\n",
    )?;

    let output = test.extract_command().arg("src/**/*").output()?;

    assert_eq!(stdout_json(&output)?, json!({ "app": { "name": "" } }));

    Ok(())
}

#[test]
fn test_no_matching_files_prints_empty_dictionary() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.extract_command().arg("src/**/*.svelte").output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)?, json!({}));
    assert!(stderr(&output).contains("no files matched"));

    Ok(())
}

#[test]
fn test_no_subcommand_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("extract"));

    Ok(())
}
