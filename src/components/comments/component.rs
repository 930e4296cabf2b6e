use leptos::prelude::*;

use super::tree::{build_comment_tree, count_comments};
use super::types::{Comment, CommentNode};

const AUTHOR_KEYS: &[&str] = &["authorName", "author", "userName"];
const BODY_KEYS: &[&str] = &["content", "text", "body"];

/// Threaded comment list for a gallery photo. Rebuilds the reply tree
/// whenever `comments` changes.
#[component]
pub fn CommentThread(
	/// Flat comment list as fetched.
	#[prop(into)]
	comments: Signal<Vec<Comment>>,
) -> impl IntoView {
	let tree = Memo::new(move |_| comments.with(|list| build_comment_tree(list)));
	let total = move || tree.with(|t| count_comments(t));

	view! {
		<section class="comment-thread">
			<h3 class="comment-count">
				{move || match total() {
					1 => "1 comment".to_string(),
					n => format!("{n} comments"),
				}}
			</h3>
			<ul class="comment-list">
				{move || {
					tree.get()
						.into_iter()
						.map(|node| view! { <CommentItem node=node /> })
						.collect_view()
				}}
			</ul>
		</section>
	}
}

#[component]
fn CommentItem(node: CommentNode) -> AnyView {
	let reply_count = node.reply_count();
	let mut node = node;
	let replies = std::mem::take(&mut node.replies);
	let comment = &node.comment;
	let author = comment.text_field(AUTHOR_KEYS).unwrap_or("Unknown").to_string();
	let body = comment.text_field(BODY_KEYS).unwrap_or_default().to_string();
	let created = comment.text_field(&["createdAt"]).map(str::to_string);

	view! {
		<li class="comment" data-comment-id=comment.id.to_string()>
			<div class="comment-header">
				<span class="comment-author">{author}</span>
				{created.map(|ts| view! { <time class="comment-time">{ts}</time> })}
			</div>
			<p class="comment-body">{body}</p>
			{(reply_count > 0).then(|| {
				view! {
					<span class="comment-replies-count">
						{if reply_count == 1 {
							"1 reply".to_string()
						} else {
							format!("{reply_count} replies")
						}}
					</span>
					<ul class="comment-replies">
						{replies
							.into_iter()
							.map(|reply| view! { <CommentItem node=reply /> })
							.collect_view()}
					</ul>
				}
			})}
		</li>
	}
	.into_any()
}
