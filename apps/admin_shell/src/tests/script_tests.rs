use super::*;

#[test]
fn parses_commands_and_skips_comments() {
    let steps = parse(
        "# warm up\n\
         click optimize\n\
         \n\
         key Ctrl+O\n\
         wait 250\n\
         fill exam-title  Final exam \n\
         resize 480 800\n\
         navigate\n\
         theme dark\n\
         language de\n",
    )
    .expect("script");

    let commands: Vec<_> = steps.iter().map(|s| s.command.clone()).collect();
    assert_eq!(
        commands,
        vec![
            Command::Click("optimize".into()),
            Command::Key(KeyPress::ctrl("o")),
            Command::Wait(Duration::from_millis(250)),
            Command::Fill {
                name: "exam-title".into(),
                value: "Final exam".into(),
            },
            Command::Resize(Viewport {
                width: 480,
                height: 800,
            }),
            Command::Navigate,
            Command::Theme(Theme::Dark),
            Command::Language("de".into()),
        ]
    );
    assert_eq!(steps[0].line, 2);
    assert_eq!(steps[1].line, 4);
}

#[test]
fn fill_without_value_clears_the_field() {
    let steps = parse("fill exam-title").expect("script");
    assert_eq!(
        steps[0].command,
        Command::Fill {
            name: "exam-title".into(),
            value: String::new(),
        }
    );
}

#[test]
fn key_combinations() {
    let key = |raw: &str| match parse(&format!("key {raw}")).expect("key")[0].command.clone() {
        Command::Key(press) => press,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(key("escape"), KeyPress::plain("Escape"));
    assert_eq!(key("cmd+s"), KeyPress::meta("s"));
    assert_eq!(key("ctrl+meta+s").ctrl, true);
    assert_eq!(key("ctrl+meta+s").meta, true);
    assert_eq!(key("Enter"), KeyPress::plain("Enter"));
}

#[test]
fn reports_line_numbers_on_errors() {
    assert_eq!(
        parse("click a\nhover b"),
        Err(ScriptError::UnknownCommand {
            line: 2,
            command: "hover".into(),
        })
    );
    assert_eq!(
        parse("\n\nwait soon"),
        Err(ScriptError::InvalidArgument {
            line: 3,
            what: "duration",
            value: "soon".into(),
        })
    );
    assert!(matches!(
        parse("resize 100"),
        Err(ScriptError::MissingArgument { line: 1, command: "resize", .. })
    ));
    assert!(matches!(
        parse("key shift+s"),
        Err(ScriptError::InvalidArgument { what: "key modifier", .. })
    ));
    assert!(matches!(
        parse("theme neon"),
        Err(ScriptError::InvalidArgument { what: "theme", .. })
    ));
}
