use excuseboard_core::db::open_db_in_memory;
use excuseboard_core::{
    CommentRecord, CommentService, Member, MemberService, PageRequest, PostRecord, PostService,
    ServiceError, SqliteCommentRepository, SqliteMemberRepository, SqlitePostRepository,
    SqliteVoteRepository, ValidationError, VoteOutcome, VoteService, VoteType,
};
use rusqlite::Connection;

fn register_member(conn: &Connection, nickname: &str) -> Member {
    let repo = SqliteMemberRepository::try_new(conn).unwrap();
    MemberService::new(repo).register(nickname).unwrap()
}

fn create_post(conn: &mut Connection, member_id: i64) -> PostRecord {
    let repo = SqlitePostRepository::try_new(conn).unwrap();
    let mut service = PostService::new(repo);
    service
        .create_post(
            member_id,
            "overdue review",
            "the diff reviewed itself, badly",
            vec![],
        )
        .unwrap()
}

fn create_comment(
    conn: &mut Connection,
    post_id: i64,
    member_id: i64,
    content: &str,
) -> CommentRecord {
    let repo = SqliteCommentRepository::try_new(conn).unwrap();
    let mut service = CommentService::new(repo);
    service
        .create_comment(post_id, member_id, content, false)
        .unwrap()
}

fn comment_counters(conn: &Connection, comment_id: i64) -> (i64, i64) {
    conn.query_row(
        "SELECT upvote_count, downvote_count FROM comments WHERE id = ?1;",
        [comment_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .unwrap()
}

#[test]
fn create_comment_returns_decorated_record() {
    let mut conn = open_db_in_memory().unwrap();
    let author = register_member(&conn, "author");
    let commenter = register_member(&conn, "commenter");
    let post = create_post(&mut conn, author.id);

    let record = create_comment(&mut conn, post.post_id, commenter.id, "classic excuse");
    assert_eq!(record.post_id, post.post_id);
    assert_eq!(record.author.nickname, "commenter");
    assert_eq!(record.content, "classic excuse");
    assert!(!record.is_reply);
    assert_eq!((record.upvote_count, record.downvote_count), (0, 0));
    assert_eq!(record.my_vote, None);

    // The parent post's comment_count reflects the new comment.
    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let service = PostService::new(repo);
    let parent = service.get_post(post.post_id, None).unwrap().unwrap();
    assert_eq!(parent.comment_count, 1);
}

#[test]
fn create_comment_validates_content_and_target() {
    let mut conn = open_db_in_memory().unwrap();
    let author = register_member(&conn, "author");
    let post = create_post(&mut conn, author.id);

    let repo = SqliteCommentRepository::try_new(&mut conn).unwrap();
    let mut service = CommentService::new(repo);

    let blank = service
        .create_comment(post.post_id, author.id, "   ", false)
        .unwrap_err();
    assert!(matches!(
        blank,
        ServiceError::Validation(ValidationError::CommentLengthOutOfRange { .. })
    ));

    let overlong = service
        .create_comment(post.post_id, author.id, &"z".repeat(201), false)
        .unwrap_err();
    assert!(matches!(
        overlong,
        ServiceError::Validation(ValidationError::CommentLengthOutOfRange { .. })
    ));

    let missing_post = service
        .create_comment(404, author.id, "into the void", false)
        .unwrap_err();
    assert!(matches!(missing_post, ServiceError::PostNotFound(404)));

    let missing_member = service
        .create_comment(post.post_id, 404, "ghost comment", false)
        .unwrap_err();
    assert!(matches!(missing_member, ServiceError::MemberNotFound(404)));
}

#[test]
fn is_reply_flag_round_trips() {
    let mut conn = open_db_in_memory().unwrap();
    let author = register_member(&conn, "author");
    let post = create_post(&mut conn, author.id);

    let repo = SqliteCommentRepository::try_new(&mut conn).unwrap();
    let mut service = CommentService::new(repo);
    let reply = service
        .create_comment(post.post_id, author.id, "replying to myself", true)
        .unwrap();
    assert!(reply.is_reply);
}

#[test]
fn comments_list_in_conversation_order_with_page_math() {
    let mut conn = open_db_in_memory().unwrap();
    let author = register_member(&conn, "author");
    let post = create_post(&mut conn, author.id);
    let c1 = create_comment(&mut conn, post.post_id, author.id, "first");
    let c2 = create_comment(&mut conn, post.post_id, author.id, "second");
    let c3 = create_comment(&mut conn, post.post_id, author.id, "third");

    let repo = SqliteCommentRepository::try_new(&mut conn).unwrap();
    let service = CommentService::new(repo);

    let first_page = service
        .list_comments(post.post_id, &PageRequest::new(0, 2), None)
        .unwrap();
    let ids: Vec<_> = first_page.items.iter().map(|item| item.comment_id).collect();
    assert_eq!(ids, vec![c1.comment_id, c2.comment_id]);
    assert_eq!(first_page.total_elements, 3);
    assert_eq!(first_page.total_pages, 2);

    let second_page = service
        .list_comments(post.post_id, &PageRequest::new(1, 2), None)
        .unwrap();
    let ids: Vec<_> = second_page.items.iter().map(|item| item.comment_id).collect();
    assert_eq!(ids, vec![c3.comment_id]);
}

#[test]
fn comment_votes_toggle_and_decorate_like_post_votes() {
    let mut conn = open_db_in_memory().unwrap();
    let author = register_member(&conn, "author");
    let m1 = register_member(&conn, "member-one");
    let m2 = register_member(&conn, "member-two");
    let post = create_post(&mut conn, author.id);
    let comment = create_comment(&mut conn, post.post_id, author.id, "vote on me");

    {
        let repo = SqliteVoteRepository::try_new(&mut conn).unwrap();
        let mut service = VoteService::new(repo);

        assert_eq!(
            service
                .vote_on_comment(comment.comment_id, m1.id, VoteType::Upvote)
                .unwrap(),
            VoteOutcome::Created
        );
        assert_eq!(
            service
                .vote_on_comment(comment.comment_id, m2.id, VoteType::Downvote)
                .unwrap(),
            VoteOutcome::Created
        );

        let conflict = service
            .vote_on_comment(comment.comment_id, m1.id, VoteType::Downvote)
            .unwrap_err();
        assert!(matches!(
            conflict,
            ServiceError::AlreadyVoted(VoteType::Upvote)
        ));

        let missing = service
            .vote_on_comment(90210, m1.id, VoteType::Upvote)
            .unwrap_err();
        assert!(matches!(missing, ServiceError::CommentNotFound(90210)));
    }
    assert_eq!(comment_counters(&conn, comment.comment_id), (1, 1));

    {
        let repo = SqliteCommentRepository::try_new(&mut conn).unwrap();
        let service = CommentService::new(repo);
        let request = PageRequest::default();

        let for_m1 = service
            .list_comments(post.post_id, &request, Some(m1.id))
            .unwrap();
        assert_eq!(for_m1.items[0].my_vote, Some(VoteType::Upvote));

        let for_m2 = service
            .list_comments(post.post_id, &request, Some(m2.id))
            .unwrap();
        assert_eq!(for_m2.items[0].my_vote, Some(VoteType::Downvote));

        let anonymous = service
            .list_comments(post.post_id, &request, None)
            .unwrap();
        assert_eq!(anonymous.items[0].my_vote, None);
        assert_eq!(
            (
                anonymous.items[0].upvote_count,
                anonymous.items[0].downvote_count
            ),
            (1, 1)
        );
    }

    {
        let repo = SqliteVoteRepository::try_new(&mut conn).unwrap();
        let mut service = VoteService::new(repo);
        assert_eq!(
            service
                .vote_on_comment(comment.comment_id, m1.id, VoteType::Upvote)
                .unwrap(),
            VoteOutcome::Cancelled
        );
    }
    assert_eq!(comment_counters(&conn, comment.comment_id), (0, 1));
}

#[test]
fn listing_comments_of_missing_post_fails_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    register_member(&conn, "alone");

    let repo = SqliteCommentRepository::try_new(&mut conn).unwrap();
    let service = CommentService::new(repo);
    let err = service
        .list_comments(5150, &PageRequest::default(), None)
        .unwrap_err();
    assert!(matches!(err, ServiceError::PostNotFound(5150)));
}
