use super::*;

fn parse(json: &str) -> Result<Command, CommandError> {
    let msg: Message = serde_json::from_str(json).unwrap();
    Command::try_from(msg)
}

#[test]
fn decodes_every_command() {
    assert_eq!(parse(r#"{"type":"close"}"#), Ok(Command::Close));
    assert_eq!(
        parse(r#"{"type":"view-frame","id":"1:2"}"#),
        Ok(Command::ViewFrame("1:2".into()))
    );
    assert_eq!(
        parse(r#"{"type":"update-order","order":["eyes","bg"]}"#),
        Ok(Command::UpdateOrder(vec!["eyes".into(), "bg".into()]))
    );
    assert_eq!(parse(r#"{"type":"randomize"}"#), Ok(Command::Randomize));
    assert_eq!(parse(r#"{"type":"clear-canvas"}"#), Ok(Command::ClearCanvas));
    assert_eq!(parse(r#"{"type":"save-order"}"#), Ok(Command::SaveOrder));
    assert_eq!(
        parse(r#"{"type":"delete-order","order":"bg,eyes"}"#),
        Ok(Command::DeleteOrder("bg,eyes".to_string()))
    );
    assert_eq!(
        parse(r#"{"type":"replace-trait","layer":"eyes"}"#),
        Ok(Command::ReplaceTrait("eyes".into()))
    );
    assert_eq!(
        parse(r#"{"type":"randomize-trait","layer":"eyes"}"#),
        Ok(Command::RandomizeTrait("eyes".into()))
    );
    assert_eq!(
        parse(r#"{"type":"delete-trait","layer":"eyes"}"#),
        Ok(Command::DeleteTrait("eyes".into()))
    );
}

#[test]
fn update_order_accepts_saved_form() {
    assert_eq!(
        parse(r#"{"type":"update-order","order":"eyes,bg"}"#),
        Ok(Command::UpdateOrder(vec!["eyes".into(), "bg".into()]))
    );
}

#[test]
fn missing_fields_are_reported() {
    assert_eq!(
        parse(r#"{"type":"view-frame"}"#),
        Err(CommandError::MissingField {
            command: "view-frame",
            field: "id"
        })
    );
    assert_eq!(
        parse(r#"{"type":"update-order"}"#),
        Err(CommandError::MissingField {
            command: "update-order",
            field: "order"
        })
    );
    assert_eq!(
        parse(r#"{"type":"delete-order","order":""}"#),
        Err(CommandError::MissingField {
            command: "delete-order",
            field: "order"
        })
    );
    assert_eq!(
        parse(r#"{"type":"replace-trait","layer":""}"#),
        Err(CommandError::MissingField {
            command: "replace-trait",
            field: "layer"
        })
    );
}

#[test]
fn unknown_type_is_an_error() {
    let err = parse(r#"{"type":"explode"}"#).unwrap_err();
    assert_eq!(err, CommandError::UnknownType("explode".to_string()));
    assert!(err.to_string().contains("\"explode\""));
}
