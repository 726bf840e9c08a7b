use super::*;

#[test]
fn faq_show_prints_entry() {
    let mut kb = KnowledgeBase::with_defaults();
    let out = run_faq_command(&mut kb, "show faq4").unwrap();
    assert_eq!(out, "[faq4] Q: What are your business hours?\n    A: We are open Monday to Friday, from 9 AM to 6 PM.");
    assert_eq!(
        run_faq_command(&mut kb, "show nope"),
        Err(FaqCommandError::Knowledge(KnowledgeError::NotFound("nope".into())))
    );
}

#[test]
fn faq_edit_rewrites_entry_in_place() {
    let mut kb = KnowledgeBase::with_defaults();
    let out = run_faq_command(&mut kb, "edit faq2 What do you charge? | Web Design from $250.").unwrap();

    assert_eq!(out, "updated [faq2] Q: What do you charge?\n    A: Web Design from $250.");
    assert_eq!(kb.faqs()[1].id, "faq2");
    assert_eq!(kb.faqs()[1].question, "What do you charge?");
    assert_eq!(kb.faqs()[1].answer, "Web Design from $250.");
    assert_eq!(kb.len(), 4);
}

#[test]
fn faq_edit_errors() {
    let mut kb = KnowledgeBase::with_defaults();
    assert_eq!(run_faq_command(&mut kb, "edit faq2"), Err(FaqCommandError::Usage));
    assert_eq!(
        run_faq_command(&mut kb, "edit faq2 What do you charge?"),
        Err(FaqCommandError::Knowledge(KnowledgeError::Blank))
    );
    assert_eq!(
        run_faq_command(&mut kb, "edit faq9 Q | A"),
        Err(FaqCommandError::Knowledge(KnowledgeError::NotFound("faq9".into())))
    );
    assert_eq!(kb, KnowledgeBase::with_defaults());
}

#[test]
fn faq_add_and_rm() {
    let mut kb = KnowledgeBase::with_defaults();
    let out = run_faq_command(&mut kb, "add Do you offer hosting? | Yes, for the first year.").unwrap();
    let id = out.strip_prefix("added ").unwrap().to_string();
    assert_eq!(kb.get(&id).map(|f| f.answer.as_str()), Some("Yes, for the first year."));

    let out = run_faq_command(&mut kb, &format!("rm {id}")).unwrap();
    assert_eq!(out, "removed: Do you offer hosting?");
    assert_eq!(kb, KnowledgeBase::with_defaults());
}

#[test]
fn unknown_faq_action_is_usage() {
    let mut kb = KnowledgeBase::with_defaults();
    assert_eq!(run_faq_command(&mut kb, "rename faq1"), Err(FaqCommandError::Usage));
    assert_eq!(run_faq_command(&mut kb, ""), Err(FaqCommandError::Usage));
}

#[test]
fn load_faqs_rejects_blank_entries() {
    let path = std::env::temp_dir().join(format!("receptionist-faqs-{}.json", std::process::id()));
    std::fs::write(&path, r#"[{"id":"a","question":"Hours?","answer":"9 to 6."},{"id":"b","question":" ","answer":"x"}]"#)
        .unwrap();

    let err = load_faqs(path.clone()).unwrap_err();
    std::fs::remove_file(&path).unwrap();

    match err {
        CliError::FaqEntry { source, .. } => assert_eq!(source, KnowledgeError::BlankEntry("b".into())),
        other => panic!("expected FaqEntry, got {other:?}"),
    }
}

#[test]
fn load_faqs_accepts_valid_file() {
    let path = std::env::temp_dir().join(format!("receptionist-faqs-ok-{}.json", std::process::id()));
    std::fs::write(&path, r#"[{"question":"Hours?","answer":"9 to 6."}]"#).unwrap();

    let kb = load_faqs(path.clone()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(kb.len(), 1);
    assert_eq!(kb.faqs()[0].question, "Hours?");
}
