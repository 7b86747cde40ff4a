//! End-to-end parsing over realistic page fixtures.

use hnkit::internal::scrape::{comments, posts};
use hnkit::internal::thread::CommentThread;
use hnkit::{CommentVisibility, PostType};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

const FRONT_PAGE: &str = r#"<html><body><center><table border="0">
    <tr class="athing submission" id="101">
        <td align="right" valign="top" class="title"><span class="rank">1.</span></td>
        <td valign="top" class="votelinks"><center><a id="up_101" href="vote?id=101&amp;how=up&amp;goto=news"></a></center></td>
        <td class="title"><span class="titleline"><a href="https://example.com/a">First story</a><span class="sitebit comhead"> (<a href="from?site=example.com"><span class="sitestr">example.com</span></a>)</span></span></td>
    </tr>
    <tr><td colspan="2"></td><td class="subtext"><span class="subline">
        <span class="score" id="score_101">120 points</span> by <a href="user?id=alice" class="hnuser">alice</a>
        <span class="age" title="2023-05-05T12:00:00"><a href="item?id=101">3 hours ago</a></span>
        | <a href="hide?id=101&amp;goto=news">hide</a>
        | <a href="item?id=101">64&nbsp;comments</a>
    </span></td></tr>
    <tr class="spacer" style="height:5px"></tr>
    <tr class="athing submission" id="102">
        <td align="right" valign="top" class="title"><span class="rank">2.</span></td>
        <td valign="top" class="votelinks"><center><a id="up_102" class="nosee" href="vote?id=102&amp;how=up&amp;goto=news"></a></center></td>
        <td class="title"><span class="titleline"><a href="item?id=102">Ask HN: Second story?</a></span></td>
    </tr>
    <tr><td colspan="2"></td><td class="subtext"><span class="subline">
        <span class="score" id="score_102">45 points</span> by <a href="user?id=bob" class="hnuser">bob</a>
        <span class="age" title="2023-05-05T10:00:00"><a href="item?id=102">5 hours ago</a></span>
        | <a href="item?id=102">discuss</a>
    </span></td></tr>
    <tr class="spacer" style="height:5px"></tr>
    <tr class="athing" id="103">
        <td align="right" valign="top" class="title"><span class="rank">3.</span></td>
        <td></td>
        <td class="title"><span class="titleline"><a href="https://jobs.example.com">Acme is hiring</a></span></td>
    </tr>
    <tr><td colspan="2"></td><td class="subtext">
        <span class="age" title="2023-05-05T09:00:00"><a href="item?id=103">6 hours ago</a></span>
    </td></tr>
</table></center></body></html>"#;

fn comment_row(id: u32, width: u32, body: &str) -> String {
    format!(
        r#"<tr class="athing comtr" id="{id}"><td><table border="0"><tr>
            <td class="ind" indent="{level}"><img src="s.gif" height="1" width="{width}"></td>
            <td valign="top" class="votelinks"><center><a id="up_{id}" href="vote?id={id}&amp;how=up&amp;auth=ab"></a></center></td>
            <td class="default">
                <div style="margin-top:2px; margin-bottom:-10px;"><span class="comhead">
                    <a href="user?id=u{id}" class="hnuser">u{id}</a>
                    <span class="age" title="2023-05-05T11:00:00"><a href="item?id={id}">2 hours ago</a></span>
                </span></div>
                <br>
                <div class="comment"><span class="commtext c00">{body}<div class="reply"><p><font size="1"><u><a href="reply?id={id}">reply</a></u></font></p></div></span></div>
            </td>
        </tr></table></td></tr>"#,
        level = width / 40,
    )
}

fn ask_item_page() -> String {
    format!(
        r#"<html><body><center>
        <table class="fatitem" border="0">
            <tr class="athing" id="102"><td class="title"><span class="titleline"><a href="item?id=102">Ask HN: Second story?</a></span></td></tr>
            <tr><td class="subtext"><span class="score" id="score_102">45 points</span> by <a class="hnuser" href="user?id=bob">bob</a> <span class="age" title="2023-05-05T10:00:00"><a href="item?id=102">5 hours ago</a></span></td></tr>
            <tr style="height:2px"></tr>
            <tr><td colspan="2"></td><td><div class="toptext">What do people use?<p>Curious about workflows.</p></div></td></tr>
        </table>
        <table class="comment-tree" border="0">
            {}
            {}
            {}
            {}
        </table>
        </center></body></html>"#,
        comment_row(201, 0, "Top answer with a <a href=\"https://example.com/tool\">tool...</a>"),
        comment_row(202, 40, "Nested reply"),
        comment_row(203, 80, "Deeper still"),
        comment_row(204, 0, "Another top answer"),
    )
}

#[test]
fn front_page_parses_all_story_kinds() {
    init_tracing();
    let posts = posts::parse_post_list(FRONT_PAGE, PostType::News);
    assert_eq!(posts.len(), 3);

    assert_eq!(posts[0].id, 101);
    assert_eq!(posts[0].title, "First story");
    assert_eq!(posts[0].score, 120);
    assert_eq!(posts[0].comments_count, 64);
    assert!(!posts[0].upvoted);
    assert!(posts[0].vote_links.is_some());

    // already-voted story: suppressed upvote anchor, synthesized unvote
    assert!(posts[1].upvoted);
    let links = posts[1].vote_links.as_ref().unwrap();
    assert_eq!(
        links.unvote.as_deref(),
        Some("vote?id=102&how=un&goto=news")
    );
    assert_eq!(posts[1].comments_count, 0);

    // job row: no votes, no score, no author
    assert_eq!(posts[2].id, 103);
    assert_eq!(posts[2].score, 0);
    assert_eq!(posts[2].by, "");
    assert!(posts[2].vote_links.is_none());
}

#[test]
fn ask_item_yields_pseudo_comment_then_thread() {
    init_tracing();
    let html = ask_item_page();
    let post = posts::parse_post(&html, PostType::Ask).expect("item parse");
    assert_eq!(post.id, 102);
    assert!(post.text.as_deref().unwrap().contains("What do people use?"));

    let thread = comments::parse_comments(&html, Some(&post));
    assert_eq!(thread.len(), 5);

    // self-text pseudo-comment leads at level 0 with the post's identity
    assert_eq!(thread[0].id, 102);
    assert_eq!(thread[0].level, 0);
    assert_eq!(thread[0].by, "bob");

    assert_eq!(
        thread.iter().map(|c| c.level).collect::<Vec<_>>(),
        vec![0, 0, 1, 2, 0]
    );

    // reply controls are stripped, anchors rewritten to their target
    assert!(!thread[1].text.contains("reply?id="));
    assert!(thread[1].text.contains(r#"<a href="https://example.com/tool">https://example.com/tool</a>"#));
}

#[test]
fn parsed_thread_drives_visibility() {
    let html = ask_item_page();
    let post = posts::parse_post(&html, PostType::Ask).expect("item parse");
    let mut thread = CommentThread::new(comments::parse_comments(&html, Some(&post)));

    assert_eq!(thread.visible_count(), 5);

    // collapse the first real answer: its two descendants hide
    let outcome = thread.toggle(1).expect("toggle");
    assert_eq!(outcome.visibility, CommentVisibility::Compact);
    assert_eq!(outcome.changed, vec![2, 3]);
    assert_eq!(thread.visible_indices(), vec![0, 1, 4]);

    thread.toggle(1);
    assert_eq!(thread.visible_count(), 5);
}

#[test]
fn comment_bodies_render_lazily_from_parsed_text() {
    let html = ask_item_page();
    let thread = comments::parse_comments(&html, None);
    let runs = thread[0].rendered();
    assert!(!runs.is_empty());
    let linked = runs.iter().find(|run| run.link.is_some()).expect("link run");
    assert_eq!(linked.link.as_deref(), Some("https://example.com/tool"));
}
