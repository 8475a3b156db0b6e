//! Comment threads flattened into one row per comment or reply

use tracing::{debug, error, info};

use crate::api::{CommentResource, DataApi};
use crate::model::Comment;

/// Fetch every comment and reply for the given videos.
///
/// Each video is paginated until the provider stops returning a continuation
/// token. A failed page ends that video's pagination only; rows already
/// collected are kept.
pub async fn fetch_comments<I, S>(data: &dyn DataApi, video_ids: I) -> Vec<Comment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut all_comments = Vec::new();

    for video_id in video_ids {
        let video_id = video_id.as_ref();
        let before = all_comments.len();
        let mut page_token: Option<String> = None;

        loop {
            let page = match data.list_comment_threads(video_id, page_token.as_deref()).await {
                Ok(page) => page,
                Err(e) => {
                    error!("Error fetching comments for video {}: {}", video_id, e);
                    break;
                }
            };

            for thread in page.items {
                let top_id = thread.id;
                all_comments.push(to_comment(video_id, thread.snippet.top_level_comment, None));

                if let Some(replies) = thread.replies {
                    for reply in replies.comments {
                        all_comments.push(to_comment(video_id, reply, Some(&top_id)));
                    }
                }
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("Video {}: {} comments", video_id, all_comments.len() - before);
    }

    info!("Fetched {} comments and replies", all_comments.len());
    all_comments
}

fn to_comment(video_id: &str, resource: CommentResource, parent: Option<&str>) -> Comment {
    let snippet = resource.snippet;
    Comment {
        video_id: video_id.to_string(),
        comment_id: resource.id,
        parent_comment_id: parent.map(str::to_string),
        author: snippet.author_display_name,
        published_at: snippet.published_at,
        like_count: snippet.like_count,
        text: snippet.text_display,
        text_translated: None,
        is_reply: parent.is_some(),
        anonymized: false,
    }
}
