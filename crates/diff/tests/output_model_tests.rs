use cell_diff::{
    Chunk, CollapseHints, DiffConfig, DiffEntry, DiffModel, Error, OutputDiffModel, OutputType,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn execute_result(text: &str) -> Value {
    json!({
        "output_type": "execute_result",
        "execution_count": 1,
        "metadata": {},
        "data": {"text/plain": text}
    })
}

fn stream(text: &str) -> Value {
    json!({"output_type": "stream", "name": "stdout", "text": text})
}

#[test]
fn test_sub_path_takes_its_own_mimetype() {
    let model = OutputDiffModel::from_pair(
        Some(execute_result("1")),
        Some(execute_result("2")),
        DiffConfig::default(),
    )
    .unwrap();

    let text = model.stringify(Some("data.text/plain")).unwrap();

    assert_eq!(text.mimetype(), "text/plain");
    assert_eq!(text.base(), Some("1"));
    assert_eq!(text.remote(), Some("2"));
    assert_eq!(text.get_chunks(), vec![Chunk::new(0, 1, 0, 1)]);
}

#[test]
fn test_whole_output_is_json() {
    let hints = CollapseHints {
        collapsible: true,
        header: "Output changed".to_string(),
        start_collapsed: false,
    };
    let model = OutputDiffModel::from_pair(
        Some(execute_result("1")),
        Some(execute_result("2")),
        DiffConfig::default(),
    )
    .unwrap()
    .with_collapse_hints(hints.clone());

    let whole = model.stringify(None).unwrap();

    assert_eq!(whole.mimetype(), "application/json");
    assert_eq!(whole.collapse_hints(), &hints);
    assert!(whole.remote().unwrap().contains("\"text/plain\": \"2\""));
    assert_eq!(whole.get_chunks().len(), 1);
}

#[test]
fn test_stream_text_change() {
    let model = OutputDiffModel::from_pair(
        Some(stream("a\nb\n")),
        Some(stream("a\nc\n")),
        DiffConfig::default(),
    )
    .unwrap();

    assert_eq!(model.output_type().unwrap(), OutputType::Stream);

    let text = model.stringify(Some("text")).unwrap();
    assert_eq!(text.mimetype(), "text/plain");
    assert_eq!(text.remote(), Some("a\nc\n"));
    assert_eq!(text.get_chunks(), vec![Chunk::new(1, 2, 1, 2)]);
}

#[test]
fn test_stream_change_without_line_patches() {
    let config = DiffConfig::default().with_line_patches(false);
    let model = OutputDiffModel::from_pair(Some(stream("a\nb\n")), Some(stream("a\nc\n")), config).unwrap();

    let text = model.stringify(Some("text")).unwrap();
    assert_eq!(text.get_chunks(), vec![Chunk::new(1, 2, 1, 2)]);
}

#[test]
fn test_has_mime_type_for_streams() {
    let model = OutputDiffModel::new(Some(stream("hi\n")), None, None).unwrap();

    assert_eq!(
        model.has_mime_type("application/vnd.jupyter.stdout").as_deref(),
        Some("text")
    );
    assert_eq!(
        model.has_mime_type("application/vnd.jupyter.console-text").as_deref(),
        Some("text")
    );
    assert_eq!(model.has_mime_type("application/vnd.jupyter.stderr"), None);
    assert_eq!(model.has_mime_type("text/plain"), None);
}

#[test]
fn test_has_mime_type_for_rich_outputs() {
    let model = OutputDiffModel::new(None, Some(execute_result("1")), None).unwrap();

    assert_eq!(
        model.has_mime_type("text/plain").as_deref(),
        Some("data.text/plain")
    );
    assert_eq!(model.has_mime_type("image/png"), None);

    let error = json!({"output_type": "error", "ename": "E", "evalue": "", "traceback": []});
    let model = OutputDiffModel::new(Some(error), None, None).unwrap();
    assert_eq!(model.has_mime_type("text/plain"), None);
    assert_eq!(
        model.has_mime_type("application/vnd.jupyter.console-text").as_deref(),
        Some("traceback")
    );
}

#[test]
fn test_inner_mime_type() {
    let model = OutputDiffModel::new(Some(stream("x")), None, None).unwrap();
    assert_eq!(model.inner_mime_type("text").unwrap(), "text/plain");

    let error = json!({"output_type": "error", "traceback": ["boom"]});
    let model = OutputDiffModel::new(Some(error), None, None).unwrap();
    assert_eq!(model.inner_mime_type("traceback").unwrap(), "text/plain");

    let model = OutputDiffModel::new(Some(execute_result("x")), None, None).unwrap();
    assert_eq!(model.inner_mime_type("data.image/svg+xml").unwrap(), "image/svg+xml");
}

#[test]
fn test_unknown_mimetype_is_an_error() {
    let model = OutputDiffModel::new(Some(stream("x")), Some(stream("y")), None).unwrap();

    let result = model.stringify(Some("name"));
    assert!(matches!(
        result,
        Err(Error::UnknownMimeType { ref output_type, ref key }) if output_type == "stream" && key == "name"
    ));
}

#[test]
fn test_missing_path_key_is_an_error() {
    let model = OutputDiffModel::from_pair(
        Some(execute_result("1")),
        Some(execute_result("2")),
        DiffConfig::default(),
    )
    .unwrap();

    let result = model.stringify(Some("data.text/html"));
    assert!(matches!(
        result,
        Err(Error::UnknownPathKey { ref key, .. }) if key == "text/html"
    ));
}

#[test]
fn test_mimetype_keys_may_contain_dots() {
    let mimetype = "application/vnd.custom.v1+json";
    let output = |a: i64| json!({"output_type": "display_data", "metadata": {}, "data": {mimetype: {"a": a}}});
    let model = OutputDiffModel::from_pair(Some(output(1)), Some(output(2)), DiffConfig::default()).unwrap();

    let path = model.has_mime_type(mimetype).unwrap();
    assert_eq!(path, format!("data.{mimetype}"));

    let content = model.stringify(Some(&path)).unwrap();
    assert_eq!(content.mimetype(), mimetype);
    assert_eq!(content.base(), Some("{\n  \"a\": 1\n}"));
    assert_eq!(content.remote(), Some("{\n  \"a\": 2\n}"));
    assert_eq!(content.get_chunks(), vec![Chunk::new(1, 2, 1, 2)]);
}

#[test]
fn test_added_output() {
    let model = OutputDiffModel::new(None, Some(stream("a\nb\n")), None).unwrap();

    assert!(model.added());
    let text = model.stringify(Some("text")).unwrap();
    assert!(text.added());
    assert_eq!(text.remote(), Some("a\nb\n"));
    assert_eq!(text.get_chunks(), vec![Chunk::new(0, 2, 0, 0)]);
}

#[test]
fn test_deleted_output() {
    let model = OutputDiffModel::new(Some(stream("a\n")), None, None).unwrap();

    assert!(model.deleted());
    let text = model.stringify(Some("text")).unwrap();
    assert!(text.deleted());
    assert_eq!(text.get_chunks(), vec![Chunk::new(0, 0, 0, 1)]);
}

#[test]
fn test_unchanged_output() {
    let model = OutputDiffModel::from_pair(Some(stream("a\n")), Some(stream("a\n")), DiffConfig::default()).unwrap();

    assert!(model.unchanged());
    assert_eq!(model.diff(), None);
    assert!(model.stringify(Some("text")).unwrap().get_chunks().is_empty());
}

#[test]
fn test_remote_is_derived_from_diff() {
    let diff = vec![DiffEntry::replace("name", json!("stderr"))];
    let model = OutputDiffModel::new(Some(stream("x\n")), None, Some(diff)).unwrap();

    assert_eq!(model.remote().and_then(|remote| remote.get("name")), Some(&json!("stderr")));
    assert!(!model.deleted());
}

#[test]
fn test_output_needs_a_value() {
    let result = OutputDiffModel::new(None, None, None);
    assert!(matches!(result, Err(Error::MissingEndpoints)));
}

#[test]
fn test_replaced_member_has_no_string_diff() {
    let diff = vec![DiffEntry::replace("text", json!("x\n"))];
    let model = OutputDiffModel::new(Some(stream("a\n")), Some(stream("x\n")), Some(diff)).unwrap();

    assert!(matches!(
        model.stringify(Some("text")),
        Err(Error::MismatchedEndpoints)
    ));
}

#[test]
fn test_differing_outputs_without_diff_are_rejected() {
    let model = OutputDiffModel::new(Some(stream("a\n")), Some(stream("b\n")), None).unwrap();

    assert!(matches!(
        model.stringify(Some("text")),
        Err(Error::MismatchedEndpoints)
    ));
    assert!(matches!(model.stringify(None), Err(Error::MismatchedEndpoints)));
}

#[test]
fn test_unchanged_member_of_changed_output() {
    let base = json!({"output_type": "stream", "name": "stdout", "text": "a\n"});
    let remote = json!({"output_type": "stream", "name": "stderr", "text": "a\n"});
    let model = OutputDiffModel::from_pair(Some(base), Some(remote), DiffConfig::default()).unwrap();

    let text = model.stringify(Some("text")).unwrap();
    assert!(text.unchanged());
    assert!(text.get_chunks().is_empty());
}

#[test]
fn test_missing_output_type() {
    let model = OutputDiffModel::new(Some(json!({"text": "x"})), None, None).unwrap();

    assert!(matches!(model.output_type(), Err(Error::MissingOutputType)));
    assert_eq!(model.has_mime_type("text/plain"), None);
    assert!(matches!(
        model.stringify(Some("text")),
        Err(Error::MissingOutputType)
    ));
}

#[test]
fn test_output_type_names() {
    assert_eq!(OutputType::from("display_data"), OutputType::DisplayData);
    assert_eq!(OutputType::from("update_display_data").to_string(), "update_display_data");
    assert_eq!(OutputType::ExecuteResult.to_string(), "execute_result");
}
