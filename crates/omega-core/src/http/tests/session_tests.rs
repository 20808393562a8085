use crate::http::Session;

#[test]
fn test_sessions_get_distinct_ids() {
    let one = Session::start();
    let two = Session::start();
    assert_eq!(one.id().len(), 32);
    assert_ne!(one.id(), two.id());
    assert!(one.is_empty());
}

#[test]
fn test_put_get_forget() {
    let mut session = Session::start();
    session.put("user_id", 42).unwrap();
    session.put("roles", vec!["admin", "editor"]).unwrap();

    assert!(session.has("user_id"));
    assert_eq!(session.get::<u32>("user_id"), Some(42));
    assert_eq!(session.get::<Vec<String>>("roles"), Some(vec!["admin".to_string(), "editor".to_string()]));
    assert_eq!(session.get::<String>("user_id"), None, "Wrong type yields None");
    assert_eq!(session.len(), 2);

    assert_eq!(session.forget("user_id"), Some(serde_json::json!(42)));
    assert!(!session.has("user_id"));
    assert_eq!(session.forget("user_id"), None);
}
