use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;
use wyrmlore_api::domain::{
    comment::{entity::Comment, threading::thread_comments},
    post::entity::{Post, PostChanges, PostType},
    profile::value_objects::{EmailAddress, Username},
    shared::pagination::{MAX_PAGE_SIZE, PaginatedResponse, PaginationRequest},
    vote::{
        entity::{VoteChoice, VoteDirection},
        tally::{Tally, VoteTransition, resolve_toggle},
    },
};

#[test]
fn username_accepts_letters_digits_and_underscores() {
    assert!(Username::new("hiccup_haddock3".to_string()).is_ok());
    assert!(Username::new("  astrid  ".to_string()).is_ok());
}

#[test]
fn username_rejects_bad_length_or_characters() {
    assert!(Username::new("ab".to_string()).is_err());
    assert!(Username::new("a".repeat(31)).is_err());
    assert!(Username::new("night fury".to_string()).is_err());
    assert!(Username::new("dragon!".to_string()).is_err());
}

#[test]
fn email_is_lower_cased() {
    let email = EmailAddress::new(" Hiccup@Berk.Example ".to_string()).expect("valid email");
    assert_eq!(email.value, "hiccup@berk.example");
    assert!(EmailAddress::new("not-an-email".to_string()).is_err());
}

#[test]
fn pagination_defaults_are_safe_and_stable() {
    let p = PaginationRequest::default();
    assert_eq!(p.page, 1);
    assert_eq!(p.offset(), 0);

    let clamped = PaginationRequest::new(Some(0), Some(10_000));
    assert_eq!(clamped.page, 1);
    assert_eq!(clamped.limit, MAX_PAGE_SIZE);

    let third = PaginationRequest::new(Some(3), Some(20));
    assert_eq!(third.offset(), 40);
}

#[test]
fn paginated_response_rounds_pages_up() {
    let request = PaginationRequest::new(Some(1), Some(10));
    let response = PaginatedResponse::new(vec![(); 10], 21, request);
    assert_eq!(response.total_pages, 3);
    assert_eq!(PaginatedResponse::<()>::new(Vec::new(), 0, request).total_pages, 0);
}

#[test]
fn tally_is_ups_minus_downs() {
    use VoteDirection::{Down, Up};
    assert_eq!(Tally::from_directions([Up, Up, Up, Down]).score(), 2);
    assert_eq!(Tally::from_directions([Down, Down]).score(), -2);
}

#[test]
fn transitions_cover_every_stance_change() {
    use VoteDirection::{Down, Up};
    assert_eq!(VoteTransition::between(None, None), VoteTransition::Unchanged);
    assert_eq!(VoteTransition::between(Some(Up), Some(Up)), VoteTransition::Unchanged);
    assert_eq!(VoteTransition::between(None, Some(Down)), VoteTransition::Inserted(Down));
    assert_eq!(
        VoteTransition::between(Some(Up), Some(Down)),
        VoteTransition::Flipped { from: Up, to: Down }
    );
    assert_eq!(VoteTransition::between(Some(Down), None), VoteTransition::Removed(Down));
}

#[test]
fn toggle_clears_only_a_repeated_direction() {
    use VoteDirection::{Down, Up};
    assert_eq!(resolve_toggle(Some(Up), Some(Up)), None);
    assert_eq!(resolve_toggle(Some(Up), Some(Down)), Some(Down));
    assert_eq!(resolve_toggle(None, Some(Up)), Some(Up));
    assert_eq!(resolve_toggle(Some(Down), None), None);
}

#[test]
fn vote_choice_none_means_no_direction() {
    let none: Option<VoteDirection> = VoteChoice::None.into();
    assert_eq!(none, None);
    assert_eq!("down".parse::<VoteChoice>().ok(), Some(VoteChoice::Down));
    assert!("sideways".parse::<VoteChoice>().is_err());
}

#[test]
fn post_changes_leave_votes_alone() {
    let now = Utc::now();
    let mut post = Post {
        id: Uuid::now_v7(),
        title: "Before".into(),
        content: "Body".into(),
        post_type: PostType::Theory,
        author_id: Uuid::now_v7(),
        image_url: Some("https://example.com/fury.png".into()),
        tags: vec!["fury".into()],
        votes: 7,
        created_at: now,
        updated_at: now,
    };

    PostChanges {
        title: Some("After".into()),
        image_url: Some(None),
        ..Default::default()
    }
    .apply_to(&mut post);

    assert_eq!(post.title, "After");
    assert_eq!(post.image_url, None);
    assert_eq!(post.tags, vec!["fury".to_string()]);
    assert_eq!(post.votes, 7);
}

#[test]
fn threading_partitions_roots_replies_and_orphans() {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let post_id = Uuid::now_v7();
    let comment = |id: u128, parent: Option<u128>, minute: i64| Comment {
        id: Uuid::from_u128(id),
        post_id,
        author_id: Uuid::from_u128(42),
        content: format!("comment {id}"),
        parent_id: parent.map(Uuid::from_u128),
        votes: 0,
        created_at: base + Duration::minutes(minute),
        updated_at: base + Duration::minutes(minute),
    };

    let threads = thread_comments(vec![
        comment(4, None, 3),
        comment(2, Some(1), 1),
        comment(1, None, 0),
        comment(9, Some(77), 2),
    ]);

    assert_eq!(threads.total, 4);
    assert_eq!(threads.threads.len(), 2);
    assert_eq!(threads.threads[0].comment.id, Uuid::from_u128(1));
    assert_eq!(threads.threads[0].replies[0].comment.id, Uuid::from_u128(2));
    assert_eq!(threads.threads[1].comment.id, Uuid::from_u128(4));
    assert_eq!(threads.orphans.len(), 1);
    assert_eq!(threads.orphans[0].id, Uuid::from_u128(9));
}
