use super::*;

#[test]
fn test_invalid_input_formats_message() {
    let res: Result<()> = err_at!(InvalidInput, msg: "metric {} is empty", "cpu");
    match res {
        Err(Error::InvalidInput(ctx)) => assert!(ctx.contains("metric cpu is empty")),
        other => panic!("expected InvalidInput, got {:?}", other),
    }
}

#[test]
fn test_io_error_wraps_ok_and_err() {
    let ok: Result<u8> = err_at!(IOError, Ok(42));
    assert_eq!(ok.unwrap(), 42);

    let err: Result<u8> = err_at!(IOError, Err(io::Error::new(io::ErrorKind::Other, "boom")));
    match err {
        Err(Error::IOError(_, e)) => assert_eq!(e.to_string(), "boom"),
        other => panic!("expected IOError, got {:?}", other),
    }
}

#[test]
fn test_display_is_non_empty() {
    let err = Error::InvalidState("some ctx".to_string());
    assert!(!err.to_string().is_empty());
}
