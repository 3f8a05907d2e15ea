use excuseboard_core::db::open_db_in_memory;
use excuseboard_core::{
    Member, MemberService, PageRequest, PostRecord, PostService, PostStatus, ServiceError,
    SqliteMemberRepository, SqlitePostRepository, SqliteVoteRepository, ValidationError,
    VoteService, VoteType,
};
use rusqlite::Connection;

fn register_member(conn: &Connection, nickname: &str) -> Member {
    let repo = SqliteMemberRepository::try_new(conn).unwrap();
    MemberService::new(repo).register(nickname).unwrap()
}

fn create_post(
    conn: &mut Connection,
    member_id: i64,
    situation: &str,
    excuse: &str,
    tags: Vec<String>,
) -> PostRecord {
    let repo = SqlitePostRepository::try_new(conn).unwrap();
    let mut service = PostService::new(repo);
    service
        .create_post(member_id, situation, excuse, tags)
        .unwrap()
}

fn vote_on_post(conn: &mut Connection, post_id: i64, member_id: i64, requested: VoteType) {
    let repo = SqliteVoteRepository::try_new(conn).unwrap();
    let mut service = VoteService::new(repo);
    service.vote_on_post(post_id, member_id, requested).unwrap();
}

#[test]
fn create_post_persists_excuse_and_cleaned_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let author = register_member(&conn, "storyteller");

    let record = create_post(
        &mut conn,
        author.id,
        "late to work",
        "a pigeon held the tram hostage",
        vec![
            " transit ".to_string(),
            "transit".to_string(),
            "  ".to_string(),
            "animals".to_string(),
        ],
    );

    assert_eq!(record.author.member_id, author.id);
    assert_eq!(record.author.nickname, "storyteller");
    assert_eq!(record.situation, "late to work");
    assert_eq!(record.excuse, "a pigeon held the tram hostage");
    assert_eq!(record.tags, vec!["animals".to_string(), "transit".to_string()]);
    assert_eq!(record.status, PostStatus::Active);
    assert_eq!((record.upvote_count, record.downvote_count), (0, 0));
    assert_eq!(record.comment_count, 0);
    assert_eq!(record.my_vote, None);
    assert!(record.created_at > 0);
}

#[test]
fn create_post_rejects_short_situation_and_out_of_range_excuse() {
    let mut conn = open_db_in_memory().unwrap();
    let author = register_member(&conn, "strict");
    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let mut service = PostService::new(repo);

    let short_situation = service
        .create_post(author.id, "ab", "an excuse long enough", vec![])
        .unwrap_err();
    assert!(matches!(
        short_situation,
        ServiceError::Validation(ValidationError::SituationTooShort { .. })
    ));

    let short_excuse = service
        .create_post(author.id, "valid situation", "nope", vec![])
        .unwrap_err();
    assert!(matches!(
        short_excuse,
        ServiceError::Validation(ValidationError::ExcuseLengthOutOfRange { .. })
    ));

    let long_excuse = service
        .create_post(author.id, "valid situation", &"x".repeat(101), vec![])
        .unwrap_err();
    assert!(matches!(
        long_excuse,
        ServiceError::Validation(ValidationError::ExcuseLengthOutOfRange { .. })
    ));
}

#[test]
fn create_post_for_unknown_member_fails_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let mut service = PostService::new(repo);

    let err = service
        .create_post(77, "late again", "the dog reprogrammed my alarm", vec![])
        .unwrap_err();
    assert!(matches!(err, ServiceError::MemberNotFound(77)));
}

#[test]
fn list_posts_is_newest_first_with_page_math() {
    let mut conn = open_db_in_memory().unwrap();
    let author = register_member(&conn, "prolific");
    let p1 = create_post(&mut conn, author.id, "monday", "first excuse of the week", vec![]);
    let p2 = create_post(&mut conn, author.id, "tuesday", "second excuse of the week", vec![]);
    let p3 = create_post(&mut conn, author.id, "wednesday", "third excuse of the week", vec![]);

    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let service = PostService::new(repo);

    let first_page = service
        .list_posts(&PageRequest::new(0, 2), None)
        .unwrap();
    let ids: Vec<_> = first_page.items.iter().map(|item| item.post_id).collect();
    assert_eq!(ids, vec![p3.post_id, p2.post_id]);
    assert_eq!(first_page.total_elements, 3);
    assert_eq!(first_page.total_pages, 2);
    assert_eq!(first_page.size, 2);

    let second_page = service
        .list_posts(&PageRequest::new(1, 2), None)
        .unwrap();
    let ids: Vec<_> = second_page.items.iter().map(|item| item.post_id).collect();
    assert_eq!(ids, vec![p1.post_id]);
}

#[test]
fn list_size_defaults_to_10_and_caps_at_50() {
    let mut conn = open_db_in_memory().unwrap();
    let author = register_member(&conn, "floody");
    for idx in 0..60 {
        create_post(
            &mut conn,
            author.id,
            &format!("situation {idx}"),
            &format!("perfectly fine excuse {idx}"),
            vec![],
        );
    }

    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let service = PostService::new(repo);

    let defaulted = service.list_posts(&PageRequest::new(0, 0), None).unwrap();
    assert_eq!(defaulted.size, 10);
    assert_eq!(defaulted.items.len(), 10);

    let capped = service.list_posts(&PageRequest::new(0, 500), None).unwrap();
    assert_eq!(capped.size, 50);
    assert_eq!(capped.items.len(), 50);
}

#[test]
fn list_decorates_each_post_with_the_viewers_own_vote_only() {
    let mut conn = open_db_in_memory().unwrap();
    let author = register_member(&conn, "author");
    let m1 = register_member(&conn, "member-one");
    let m2 = register_member(&conn, "member-two");
    let pa = create_post(&mut conn, author.id, "case a", "excuse for case a", vec![]);
    let pb = create_post(&mut conn, author.id, "case b", "excuse for case b", vec![]);

    vote_on_post(&mut conn, pa.post_id, m1.id, VoteType::Upvote);
    vote_on_post(&mut conn, pa.post_id, m2.id, VoteType::Downvote);
    vote_on_post(&mut conn, pb.post_id, m2.id, VoteType::Upvote);

    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let service = PostService::new(repo);
    let request = PageRequest::new(0, 10);

    let for_m1 = service.list_posts(&request, Some(m1.id)).unwrap();
    let my_votes: Vec<_> = for_m1
        .items
        .iter()
        .map(|item| (item.post_id, item.my_vote))
        .collect();
    assert_eq!(
        my_votes,
        vec![(pb.post_id, None), (pa.post_id, Some(VoteType::Upvote))]
    );

    let for_m2 = service.list_posts(&request, Some(m2.id)).unwrap();
    let my_votes: Vec<_> = for_m2
        .items
        .iter()
        .map(|item| (item.post_id, item.my_vote))
        .collect();
    assert_eq!(
        my_votes,
        vec![
            (pb.post_id, Some(VoteType::Upvote)),
            (pa.post_id, Some(VoteType::Downvote))
        ]
    );

    // Counters are shared; my_vote is not.
    let pa_for_m1 = for_m1
        .items
        .iter()
        .find(|item| item.post_id == pa.post_id)
        .unwrap();
    assert_eq!((pa_for_m1.upvote_count, pa_for_m1.downvote_count), (1, 1));

    let anonymous = service.list_posts(&request, None).unwrap();
    assert!(anonymous.items.iter().all(|item| item.my_vote.is_none()));
}

#[test]
fn get_post_decorates_for_viewer_and_hides_deleted_posts() {
    let mut conn = open_db_in_memory().unwrap();
    let author = register_member(&conn, "author");
    let viewer = register_member(&conn, "viewer");
    let post = create_post(&mut conn, author.id, "lost keys", "keys eloped with my wallet", vec![]);

    vote_on_post(&mut conn, post.post_id, viewer.id, VoteType::Upvote);

    {
        let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
        let service = PostService::new(repo);

        let as_viewer = service.get_post(post.post_id, Some(viewer.id)).unwrap().unwrap();
        assert_eq!(as_viewer.my_vote, Some(VoteType::Upvote));

        let as_author = service.get_post(post.post_id, Some(author.id)).unwrap().unwrap();
        assert_eq!(as_author.my_vote, None);

        let anonymous = service.get_post(post.post_id, None).unwrap().unwrap();
        assert_eq!(anonymous.my_vote, None);
    }

    {
        let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
        let mut service = PostService::new(repo);
        service.delete_post(post.post_id).unwrap();

        assert!(service.get_post(post.post_id, None).unwrap().is_none());
        let listed = service.list_posts(&PageRequest::default(), None).unwrap();
        assert_eq!(listed.total_elements, 0);

        let again = service.delete_post(post.post_id).unwrap_err();
        assert!(matches!(again, ServiceError::PostNotFound(_)));
    }
}

#[test]
fn post_record_serializes_with_snake_case_vote_state() {
    let mut conn = open_db_in_memory().unwrap();
    let author = register_member(&conn, "serializer");
    let viewer = register_member(&conn, "reader");
    let post = create_post(&mut conn, author.id, "broken build", "the compiler was moody", vec![]);
    vote_on_post(&mut conn, post.post_id, viewer.id, VoteType::Downvote);

    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let service = PostService::new(repo);
    let record = service.get_post(post.post_id, Some(viewer.id)).unwrap().unwrap();

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["my_vote"], serde_json::json!("downvote"));
    assert_eq!(json["status"], serde_json::json!("active"));
    assert_eq!(json["author"]["nickname"], serde_json::json!("serializer"));
}
