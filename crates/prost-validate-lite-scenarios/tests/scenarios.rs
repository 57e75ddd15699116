use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use prost_validate_lite::{
    Error, ValidationConfig, ViolationBuffer, validate, validate_with, verdict, verdict_in,
};
use prost_validate_lite_scenarios::audit::v1 as audit;
use prost_validate_lite_scenarios::v1::{
    Account, Gender, Int32Range, ParentRecord, Person, RepeatedRules, Status, account,
    parent_record, validate_example_v1_Account, validate_example_v1_Int32Range,
    validate_example_v1_ParentRecord, validate_example_v1_Person,
    validate_example_v1_RepeatedRules,
};

const PERSON_URL: &str = "type.googleapis.com/example.v1.Person";

fn recorded<const N: usize, const P: usize>(
    buf: &ViolationBuffer<N, P>,
) -> Vec<(String, &'static str)> {
    buf.iter()
        .map(|v| (v.field_path().to_string(), v.constraint_id()))
        .collect()
}

fn int32_range() -> Int32Range {
    Int32Range {
        lt_field: 99,
        lte_field: 100,
        gt_field: 1,
        gte_field: 0,
        const_field: 42,
        range_field: 75,
    }
}

fn person() -> Person {
    Person {
        name: "John Doe".into(),
        email: "john@example.com".into(),
        age: 30,
        gender: Gender::Male as i32,
    }
}

fn child(name: &str, age: i32) -> parent_record::Child {
    parent_record::Child {
        name: name.into(),
        age,
    }
}

fn parent() -> ParentRecord {
    ParentRecord {
        name: "Jane Doe".into(),
        age: 40,
        child: Some(child("Tim", 10)),
    }
}

fn account() -> Account {
    Account {
        id: vec![7; 16],
        tags: vec!["x".into(), "y".into()],
        limits: BTreeMap::from([("cpu".to_string(), 2)]),
        members: vec![child("Kid", 10)],
        nickname: None,
        status: Status::Active as i32,
        details: Some(prost_types::Any {
            type_url: PERSON_URL.into(),
            value: Vec::new(),
        }),
        internal_note: String::new(),
        contact: Some(account::Contact::Email("a@example.com".into())),
    }
}

// Scenario 1.
#[test]
fn int32_range_reports_the_single_failing_bound() {
    let msg = Int32Range {
        lt_field: 100,
        ..int32_range()
    };
    let mut buf: ViolationBuffer = ViolationBuffer::new();
    assert!(!validate_example_v1_Int32Range(Some(&msg), Some(&mut buf)));
    assert_eq!(recorded(&buf), [("lt_field".to_string(), "int32.lt")]);
    assert!(!buf.is_truncated());
}

// Scenario 2.
#[test]
fn valid_person_passes() {
    let mut buf: ViolationBuffer = ViolationBuffer::new();
    assert!(validate_example_v1_Person(Some(&person()), Some(&mut buf)));
    assert!(buf.is_empty());
}

// Scenario 3.
#[test]
fn empty_name_fails_min_len() {
    let msg = Person {
        name: String::new(),
        ..person()
    };
    let mut buf: ViolationBuffer = ViolationBuffer::new();
    assert!(!validate_example_v1_Person(Some(&msg), Some(&mut buf)));
    assert_eq!(recorded(&buf), [("name".to_string(), "string.min_len")]);
    assert_eq!(buf.get(0).map(|v| v.message()), Some("value length must be at least 1 bytes"));
}

// Scenario 4.
#[test]
fn nested_child_violation_carries_the_full_path() {
    let msg = ParentRecord {
        child: Some(child("Tim", 25)),
        ..parent()
    };
    let mut buf: ViolationBuffer = ViolationBuffer::new();
    assert!(!validate_example_v1_ParentRecord(Some(&msg), Some(&mut buf)));
    assert!(buf.has_any());
    assert_eq!(recorded(&buf), [("child.age".to_string(), "int32.lte")]);
}

// Scenario 5.
#[test]
fn empty_repeated_field_fails_min_items() {
    let msg = RepeatedRules {
        min_items_field: Vec::new(),
        max_items_field: vec![1, 2],
    };
    let mut buf: ViolationBuffer = ViolationBuffer::new();
    assert!(!validate_example_v1_RepeatedRules(Some(&msg), Some(&mut buf)));
    assert_eq!(buf.len(), 1);
    assert_eq!(
        recorded(&buf),
        [("min_items_field".to_string(), "repeated.min_items")]
    );
}

// Scenario 6.
#[test]
fn small_buffer_truncates_when_collecting_everything() {
    let msg = Int32Range {
        lt_field: 100,
        lte_field: 101,
        gt_field: 0,
        gte_field: -1,
        ..int32_range()
    };

    let mut buf = ViolationBuffer::<2>::new();
    assert!(!verdict(
        Some(&msg),
        Some(&mut buf),
        ValidationConfig::collect_all()
    ));
    assert_eq!(buf.len(), 2);
    assert!(buf.is_truncated());
    assert_eq!(
        recorded(&buf),
        [
            ("lt_field".to_string(), "int32.lt"),
            ("lte_field".to_string(), "int32.lte"),
        ]
    );

    let Err(Error::Validation(err)) =
        validate_with::<_, 2, 128>(&msg, ValidationConfig::collect_all())
    else {
        panic!("expected a validation error");
    };
    assert_eq!(err.violations, buf);
}

#[test]
fn collect_all_entry_point_truncates_at_capacity() {
    let msg = audit::Int32Range {
        lt_field: 100,
        lte_field: 101,
        gt_field: 0,
        gte_field: -1,
        const_field: 42,
        range_field: 75,
    };

    let mut two = ViolationBuffer::<2>::new();
    assert!(!audit::validate_example_audit_v1_Int32Range(Some(&msg), Some(&mut two)));
    assert_eq!(two.len(), two.capacity());
    assert!(two.is_truncated());
    assert_eq!(
        recorded(&two),
        [
            ("lt_field".to_string(), "int32.lt"),
            ("lte_field".to_string(), "int32.lte"),
        ]
    );

    let mut all: ViolationBuffer = ViolationBuffer::new();
    assert!(!audit::validate_example_audit_v1_Int32Range(Some(&msg), Some(&mut all)));
    assert!(!all.is_truncated());
    assert_eq!(
        recorded(&all),
        [
            ("lt_field".to_string(), "int32.lt"),
            ("lte_field".to_string(), "int32.lte"),
            ("gt_field".to_string(), "int32.gt"),
            ("gte_field".to_string(), "int32.gte"),
        ]
    );
}

#[test]
fn missing_message_is_invalid_and_records_nothing() {
    let mut buf: ViolationBuffer = ViolationBuffer::new();
    assert!(!validate_example_v1_Person(None, Some(&mut buf)));
    assert!(buf.is_empty());
}

#[test]
fn verdict_does_not_need_a_buffer() {
    assert!(validate_example_v1_Person(Some(&person()), None));
    let msg = Person {
        age: 151,
        ..person()
    };
    assert!(!validate_example_v1_Person(Some(&msg), None));
}

#[test]
fn required_child_must_be_present() {
    let msg = ParentRecord {
        child: None,
        ..parent()
    };
    let mut buf: ViolationBuffer = ViolationBuffer::new();
    assert!(!validate_example_v1_ParentRecord(Some(&msg), Some(&mut buf)));
    assert_eq!(recorded(&buf), [("child".to_string(), "required")]);
}

#[test]
fn valid_account_passes() {
    assert!(validate(&account()).is_ok());
    let mut buf: ViolationBuffer = ViolationBuffer::new();
    assert!(validate_example_v1_Account(Some(&account()), Some(&mut buf)));
    assert!(buf.is_empty());
}

#[test]
fn account_paths_cover_indices_keys_and_oneofs() {
    let msg = Account {
        id: Vec::new(),
        tags: vec!["a".into(), String::new()],
        limits: BTreeMap::from([("cpu".to_string(), -1)]),
        members: vec![child("", 30)],
        nickname: Some("ab".into()),
        status: 9,
        details: Some(prost_types::Any {
            type_url: "type.googleapis.com/other.Thing".into(),
            value: Vec::new(),
        }),
        internal_note: String::new(),
        contact: None,
    };
    let Err(Error::Validation(err)) =
        validate_with::<_, 16, 128>(&msg, ValidationConfig::collect_all())
    else {
        panic!("expected a validation error");
    };
    assert_eq!(
        recorded(&err.violations),
        [
            ("id".to_string(), "required"),
            ("tags[1]".to_string(), "string.min_len"),
            ("limits[\"cpu\"]".to_string(), "int64.gte"),
            ("members[0].name".to_string(), "string.min_len"),
            ("members[0].age".to_string(), "int32.lte"),
            ("nickname".to_string(), "string.min_len"),
            ("status".to_string(), "enum.defined_only"),
            ("details".to_string(), "any.in"),
            ("contact".to_string(), "oneof.required"),
        ]
    );
    assert!(!err.violations.is_truncated());
}

#[test]
fn entry_points_stop_at_the_first_violation() {
    let msg = Account {
        id: Vec::new(),
        nickname: Some("ab".into()),
        ..account()
    };
    let mut buf: ViolationBuffer = ViolationBuffer::new();
    assert!(!validate_example_v1_Account(Some(&msg), Some(&mut buf)));
    assert_eq!(recorded(&buf), [("id".to_string(), "required")]);
}

#[test]
fn oneof_arm_rules_use_the_arm_name() {
    let msg = Account {
        contact: Some(account::Contact::Phone("12345".into())),
        ..account()
    };
    let mut buf: ViolationBuffer = ViolationBuffer::new();
    assert!(!validate_example_v1_Account(Some(&msg), Some(&mut buf)));
    assert_eq!(recorded(&buf), [("phone".to_string(), "string.min_len")]);

    let msg = Account {
        contact: Some(account::Contact::Email("not an email".into())),
        ..account()
    };
    buf.clear();
    assert!(!validate_example_v1_Account(Some(&msg), Some(&mut buf)));
    assert_eq!(recorded(&buf), [("email".to_string(), "string.email")]);
}

#[test]
fn ignored_and_zero_valued_fields_are_skipped() {
    let msg = Account {
        status: Status::Unspecified as i32,
        internal_note: String::new(),
        ..account()
    };
    assert!(validate_example_v1_Account(Some(&msg), None));
}

#[test]
fn wrong_id_length_is_reported_under_its_own_rule() {
    let msg = Account {
        id: vec![1, 2, 3],
        ..account()
    };
    let mut buf: ViolationBuffer = ViolationBuffer::new();
    assert!(!validate_example_v1_Account(Some(&msg), Some(&mut buf)));
    assert_eq!(recorded(&buf), [("id".to_string(), "bytes.len")]);
}

#[test]
fn duplicate_tags_break_uniqueness() {
    let msg = Account {
        tags: vec!["x".into(), "x".into()],
        ..account()
    };
    let mut buf: ViolationBuffer = ViolationBuffer::new();
    assert!(!validate_example_v1_Account(Some(&msg), Some(&mut buf)));
    assert_eq!(recorded(&buf), [("tags".to_string(), "repeated.unique")]);
}

#[test]
fn path_overflow_fails_without_recording() {
    let mut buf = ViolationBuffer::<16, 8>::new();
    assert!(!verdict_in::<_, 8>(
        Some(&account()),
        Some(&mut buf),
        ValidationConfig::collect_all()
    ));
    assert!(buf.is_empty());
    assert!(matches!(
        validate_with::<_, 16, 8>(&account(), ValidationConfig::collect_all()),
        Err(Error::PathOverflow(overflow)) if overflow.capacity == 8
    ));
}

#[test]
fn validation_error_lists_every_violation() {
    let msg = Int32Range {
        lt_field: 100,
        gt_field: 0,
        ..int32_range()
    };
    let err = validate_with::<_, 16, 128>(&msg, ValidationConfig::collect_all()).unwrap_err();
    let text = err.to_string();
    assert!(text.starts_with("validation errors:"), "{text}");
    assert!(text.contains("lt_field"), "{text}");
    assert!(text.contains("gt_field"), "{text}");
}

fn quota() -> audit::Quota {
    audit::Quota {
        owner: "ops".into(),
        max_connections: None,
        retries: Some(3),
        burst: None,
        label: None,
        window: Some(audit::quota::Window::Seconds(30)),
    }
}

fn quota_violations(msg: &audit::Quota) -> Vec<(String, &'static str)> {
    let mut buf: ViolationBuffer = ViolationBuffer::new();
    let ok = audit::validate_example_audit_v1_Quota(Some(msg), Some(&mut buf));
    assert_eq!(ok, buf.is_empty());
    recorded(&buf)
}

#[test]
fn collect_all_entry_point_reports_every_field() {
    let msg = audit::Quota {
        owner: String::new(),
        max_connections: Some(0),
        retries: None,
        burst: Some(3),
        label: Some("x".into()),
        window: None,
    };
    assert_eq!(
        quota_violations(&msg),
        [
            ("owner".to_string(), "string.min_len"),
            ("max_connections".to_string(), "int32.gt"),
            ("retries".to_string(), "required"),
            ("burst".to_string(), "int32.gte"),
            ("label".to_string(), "string.min_len"),
            ("window".to_string(), "oneof.required"),
        ]
    );
}

#[test]
fn unset_optional_fields_skip_their_rules() {
    assert!(quota_violations(&quota()).is_empty());
}

#[test]
fn optional_fields_set_to_zero_are_checked() {
    let msg = audit::Quota {
        max_connections: Some(0),
        ..quota()
    };
    assert_eq!(
        quota_violations(&msg),
        [("max_connections".to_string(), "int32.gt")]
    );

    let msg = audit::Quota {
        max_connections: Some(1001),
        ..quota()
    };
    assert_eq!(
        quota_violations(&msg),
        [("max_connections".to_string(), "int32.lte")]
    );
}

#[test]
fn required_optional_field_accepts_zero_but_not_absence() {
    let zero = audit::Quota {
        retries: Some(0),
        ..quota()
    };
    assert!(quota_violations(&zero).is_empty());

    let unset = audit::Quota {
        retries: None,
        ..quota()
    };
    assert_eq!(quota_violations(&unset), [("retries".to_string(), "required")]);

    let too_many = audit::Quota {
        retries: Some(6),
        ..quota()
    };
    assert_eq!(quota_violations(&too_many), [("retries".to_string(), "uint32.lte")]);
}

#[test]
fn wrapper_fields_validate_the_wrapped_value() {
    let msg = audit::Quota {
        burst: Some(0),
        label: Some(String::new()),
        ..quota()
    };
    assert_eq!(
        quota_violations(&msg),
        [
            ("burst".to_string(), "int32.gte"),
            ("label".to_string(), "string.min_len"),
        ]
    );

    let msg = audit::Quota {
        burst: Some(10),
        label: Some("eu".into()),
        ..quota()
    };
    assert!(quota_violations(&msg).is_empty());
}

#[test]
fn selected_required_oneof_arm_may_hold_its_zero_value() {
    let msg = audit::Quota {
        window: Some(audit::quota::Window::Seconds(0)),
        ..quota()
    };
    assert!(quota_violations(&msg).is_empty());

    let msg = audit::Quota {
        window: Some(audit::quota::Window::Cron(String::new())),
        ..quota()
    };
    assert!(quota_violations(&msg).is_empty());

    let msg = audit::Quota {
        window: Some(audit::quota::Window::Seconds(-1)),
        ..quota()
    };
    assert_eq!(quota_violations(&msg), [("seconds".to_string(), "int32.gte")]);
}

fn valid_range() -> impl Strategy<Value = Int32Range> {
    (i32::MIN..100, i32::MIN..=100, 1..=i32::MAX, 0..=i32::MAX, 0..=150).prop_map(
        |(lt_field, lte_field, gt_field, gte_field, range_field)| Int32Range {
            lt_field,
            lte_field,
            gt_field,
            gte_field,
            const_field: 42,
            range_field,
        },
    )
}

fn any_range() -> impl Strategy<Value = Int32Range> {
    (
        any::<i32>(),
        any::<i32>(),
        any::<i32>(),
        any::<i32>(),
        any::<i32>(),
        any::<i32>(),
    )
        .prop_map(
            |(lt_field, lte_field, gt_field, gte_field, const_field, range_field)| Int32Range {
                lt_field,
                lte_field,
                gt_field,
                gte_field,
                const_field,
                range_field,
            },
        )
}

proptest! {
    #[test]
    fn satisfying_messages_always_pass(msg in valid_range()) {
        let mut buf: ViolationBuffer = ViolationBuffer::new();
        prop_assert!(validate_example_v1_Int32Range(Some(&msg), Some(&mut buf)));
        prop_assert!(buf.is_empty());
    }

    #[test]
    fn a_single_broken_bound_reports_its_own_id(lt_field in 100..=i32::MAX) {
        let msg = Int32Range { lt_field, ..int32_range() };
        let mut buf: ViolationBuffer = ViolationBuffer::new();
        prop_assert!(!validate_example_v1_Int32Range(Some(&msg), Some(&mut buf)));
        prop_assert_eq!(recorded(&buf), vec![("lt_field".to_string(), "int32.lt")]);
    }

    #[test]
    fn buffer_never_exceeds_capacity(msg in any_range()) {
        let mut all = ViolationBuffer::<16>::new();
        let mut two = ViolationBuffer::<2>::new();
        let clean = verdict(Some(&msg), Some(&mut all), ValidationConfig::collect_all());
        let clean_two = verdict(Some(&msg), Some(&mut two), ValidationConfig::collect_all());
        prop_assert_eq!(clean, clean_two);
        prop_assert_eq!(clean, all.is_empty());
        prop_assert!(two.len() <= 2);
        prop_assert_eq!(two.is_truncated(), all.len() > 2);
        prop_assert_eq!(two.as_slice(), &all.as_slice()[..two.len()]);
    }

    #[test]
    fn validation_is_idempotent(msg in any_range()) {
        let mut first: ViolationBuffer = ViolationBuffer::new();
        let mut second: ViolationBuffer = ViolationBuffer::new();
        let a = verdict(Some(&msg), Some(&mut first), ValidationConfig::collect_all());
        let b = verdict(Some(&msg), Some(&mut second), ValidationConfig::collect_all());
        prop_assert_eq!(a, b);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn validation_order_does_not_matter(a in any_range(), b in any_range()) {
        let forward = (
            validate_example_v1_Int32Range(Some(&a), None),
            validate_example_v1_Int32Range(Some(&b), None),
        );
        let backward = (
            validate_example_v1_Int32Range(Some(&b), None),
            validate_example_v1_Int32Range(Some(&a), None),
        );
        prop_assert_eq!(forward, (backward.1, backward.0));
    }
}
