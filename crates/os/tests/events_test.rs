use kernel::Interrupt;
use os::events::parse_event;
use os::parse_script;

#[test]
fn test_parse_script_keywords_and_ids() {
    let script = "\
# boot two programs
run add.hypo
1 loop.hypo 50

none
input 1 A   # deliver a key
4 2
shutdown
";
    let events = parse_script(script, 128).unwrap();
    assert_eq!(
        events,
        vec![
            Interrupt::RunProgram {
                program: "add.hypo".into(),
                priority: 128
            },
            Interrupt::RunProgram {
                program: "loop.hypo".into(),
                priority: 50
            },
            Interrupt::None,
            Interrupt::InputCompletion { pid: 1, input: 'A' },
            Interrupt::OutputCompletion { pid: 2 },
            Interrupt::Shutdown,
        ]
    );
}

#[test]
fn test_parse_event_rejects_bad_lines() {
    assert!(parse_event("run", 128).is_err());
    assert!(parse_event("run p x", 128).is_err());
    assert!(parse_event("input 1 AB", 128).is_err());
    assert!(parse_event("input x A", 128).is_err());
    assert!(parse_event("output", 128).is_err());
    assert!(parse_event("shutdown now", 128).is_err());
    assert!(parse_event("reboot", 128).is_err());
}

#[test]
fn test_parse_script_names_the_bad_line() {
    let err = parse_script("none\nnone\nbogus 1\n", 128).unwrap_err();
    assert!(format!("{:#}", err).contains("line 3"));
}
