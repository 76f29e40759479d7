use super::*;

fn request(action: &str, params: &[(&str, &str)]) -> ActionRequest {
    ActionRequest {
        action_name: action.to_string(),
        trigger: ElementId(1),
        parameters: params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

#[test]
fn request_comes_from_nearest_action_ancestor() {
    let doc = Document::new();
    let button = doc.append(doc.root(), "button").expect("button");
    doc.set_attribute(button, "data-action", "export").expect("attr");
    doc.set_attribute(button, "data-id", "42").expect("attr");
    doc.set_attribute(button, "data-format", "csv").expect("attr");
    doc.set_attribute(button, "data-color", "red").expect("attr");
    let icon = doc.append(button, "i").expect("icon");

    let request = ActionRequest::from_target(&doc, icon).expect("request");

    assert_eq!(request.action_name, "export");
    assert_eq!(request.trigger, button);
    assert_eq!(request.parameter("id"), Some("42"));
    assert_eq!(request.parameter("format"), Some("csv"));
    assert_eq!(request.parameters.len(), 2);
}

#[test]
fn no_action_ancestor_yields_none() {
    let doc = Document::new();
    let div = doc.append(doc.root(), "div").expect("div");
    assert_eq!(ActionRequest::from_target(&doc, div), None);
}

#[test]
fn export_defaults_to_pdf_and_requires_id() {
    assert_eq!(
        Action::try_from(&request("export", &[("id", "7")])),
        Ok(Action::Export {
            id: "7".to_string(),
            format: ExportFormat::Pdf,
        })
    );

    let err = Action::try_from(&request("export", &[("format", "csv")])).unwrap_err();
    assert_eq!(err.user_message().as_deref(), Some("Export ID not found"));

    let err = Action::try_from(&request("export", &[("id", "7"), ("format", "docx")])).unwrap_err();
    assert_eq!(
        err.user_message().as_deref(),
        Some("Unsupported export format: docx")
    );
}

#[test]
fn blank_parameters_count_as_missing() {
    let err = Action::try_from(&request("export", &[("id", "  ")])).unwrap_err();
    assert!(matches!(err, ActionParseError::MissingParameter { .. }));
}

#[test]
fn delete_name_defaults_to_item() {
    assert_eq!(
        Action::try_from(&request("delete", &[("id", "3")])),
        Ok(Action::Delete {
            id: Some("3".to_string()),
            name: "item".to_string(),
        })
    );
}

#[test]
fn unknown_action_is_silent() {
    let err = Action::try_from(&request("launch-rockets", &[])).unwrap_err();
    assert_eq!(err, ActionParseError::UnknownAction("launch-rockets".to_string()));
    assert_eq!(err.user_message(), None);
}

#[test]
fn kinds_parse_case_insensitively_and_only_optimize_is_critical() {
    assert_eq!("OPTIMIZE".parse::<ActionKind>(), Ok(ActionKind::Optimize));
    let critical: Vec<ActionKind> = ActionKind::ALL
        .into_iter()
        .filter(|kind| kind.is_critical())
        .collect();
    assert_eq!(critical, vec![ActionKind::Optimize]);
}
