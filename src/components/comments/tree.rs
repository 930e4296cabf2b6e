use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use serde_json::Value;

use super::types::{Comment, CommentId, CommentNode, assemble, comments_from_json, pre_order};

enum Step<'a> {
	Enter(&'a Comment),
	Leave(&'a CommentId),
}

/// Nest a flat comment list into reply threads.
///
/// A comment whose `parent_comment_id` names an id present in `comments`
/// becomes a reply of that comment, wherever the parent sits in the list.
/// Every other comment is a root. Roots and each reply list keep the input
/// order. Reply chains may be any depth.
///
/// Comments that only hang off a parent cycle (`a -> b -> a`) have no path
/// from a root and are left out.
pub fn build_comment_tree(comments: &[Comment]) -> Vec<CommentNode> {
	let known: HashSet<&CommentId> = comments.iter().map(|c| &c.id).collect();

	let mut roots = Vec::new();
	let mut index: HashMap<&CommentId, Vec<&Comment>> = HashMap::new();
	for comment in comments {
		match comment.parent_comment_id.as_ref().filter(|p| known.contains(p)) {
			Some(parent) => index.entry(parent).or_default().push(comment),
			None => roots.push(comment),
		}
	}

	// Depth-first over the index, recording each comment with the number of
	// replies it keeps; the nodes are then put together bottom-up.
	let mut order: Vec<(Comment, usize)> = Vec::with_capacity(comments.len());
	let mut ancestry: HashSet<&CommentId> = HashSet::new();
	let mut stack: Vec<Step> = roots.iter().rev().map(|&root| Step::Enter(root)).collect();
	while let Some(step) = stack.pop() {
		let comment = match step {
			Step::Leave(id) => {
				ancestry.remove(id);
				continue;
			}
			Step::Enter(comment) => comment,
		};

		ancestry.insert(&comment.id);
		// A repeated id below itself would never bottom out.
		let kept: Vec<&Comment> = index
			.get(&comment.id)
			.map(|children| {
				children
					.iter()
					.copied()
					.filter(|child| !ancestry.contains(&child.id))
					.collect()
			})
			.unwrap_or_default();

		order.push((comment.clone(), kept.len()));
		stack.push(Step::Leave(&comment.id));
		stack.extend(kept.into_iter().rev().map(Step::Enter));
	}

	let placed = order.len();
	let tree = assemble(order);
	if placed < comments.len() {
		warn!(
			"{} of {} comments are unreachable from a root (cyclic parent references)",
			comments.len() - placed,
			comments.len()
		);
	}
	debug!("Built comment tree: {} roots, {placed} comments", tree.len());
	tree
}

/// [`build_comment_tree`] over an untrusted JSON value. Anything that is not
/// an array of comments yields an empty tree.
pub fn build_comment_tree_from_json(value: &Value) -> Vec<CommentNode> {
	build_comment_tree(&comments_from_json(value))
}

/// Pre-order walk of `tree`, each comment emitted without its replies.
pub fn flatten_comment_tree(tree: &[CommentNode]) -> Vec<Comment> {
	pre_order(tree).map(|node| node.comment.clone()).collect()
}

/// Total number of comments in `tree`, at every depth.
pub fn count_comments(tree: &[CommentNode]) -> usize {
	pre_order(tree).count()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ids::RecordId;
	use serde_json::json;

	fn ids(nodes: &[CommentNode]) -> Vec<RecordId> {
		nodes.iter().map(|n| n.comment.id.clone()).collect()
	}

	#[test]
	fn keeps_input_order_for_roots_and_replies() {
		let list = vec![
			Comment::new(1),
			Comment::new(2).reply_to(1),
			Comment::new(3),
			Comment::new(4).reply_to(1),
		];
		let tree = build_comment_tree(&list);

		assert_eq!(ids(&tree), vec![RecordId::from(1), RecordId::from(3)]);
		assert_eq!(ids(&tree[0].replies), vec![RecordId::from(2), RecordId::from(4)]);
		assert!(tree[1].replies.is_empty());
	}

	#[test]
	fn unknown_parent_becomes_root() {
		let tree = build_comment_tree(&[Comment::new(5).reply_to(999)]);
		assert_eq!(ids(&tree), vec![RecordId::from(5)]);
		assert!(tree[0].replies.is_empty());
	}

	#[test]
	fn parent_may_come_after_reply() {
		let list = vec![
			Comment::new("c").reply_to("b"),
			Comment::new("b").reply_to("a"),
			Comment::new("a"),
		];
		let tree = build_comment_tree(&list);

		assert_eq!(ids(&tree), vec![RecordId::from("a")]);
		assert_eq!(ids(&tree[0].replies), vec![RecordId::from("b")]);
		assert_eq!(ids(&tree[0].replies[0].replies), vec![RecordId::from("c")]);
		assert_eq!(count_comments(&tree), 3);
	}

	#[test]
	fn count_matches_input_length() {
		let list: Vec<Comment> = (0..50)
			.map(|i| {
				let comment = Comment::new(i);
				if i % 3 == 0 {
					comment
				} else {
					comment.reply_to(i / 2)
				}
			})
			.collect();
		assert_eq!(count_comments(&build_comment_tree(&list)), list.len());
		assert_eq!(count_comments(&[]), 0);
	}

	#[test]
	fn flatten_is_pre_order_and_strips_replies() {
		let list = vec![
			Comment::new(1),
			Comment::new(2),
			Comment::new(3).reply_to(1).with("text", "first reply"),
			Comment::new(4).reply_to(3),
		];
		let flat = flatten_comment_tree(&build_comment_tree(&list));
		let order: Vec<_> = flat.iter().map(|c| c.id.clone()).collect();

		assert_eq!(
			order,
			vec![
				RecordId::from(1),
				RecordId::from(3),
				RecordId::from(4),
				RecordId::from(2)
			]
		);
		assert_eq!(flat[1], list[2]);
	}

	#[test]
	fn cycles_do_not_hang() {
		let list = vec![
			Comment::new(1),
			Comment::new(2).reply_to(3),
			Comment::new(3).reply_to(2),
			Comment::new(4).reply_to(4),
		];
		let tree = build_comment_tree(&list);
		assert_eq!(ids(&tree), vec![RecordId::from(1)]);
		assert_eq!(count_comments(&tree), 1);
	}

	#[test]
	fn repeated_id_under_itself_stops() {
		let list = vec![Comment::new(1), Comment::new(1).reply_to(1)];
		let tree = build_comment_tree(&list);
		assert_eq!(ids(&tree), vec![RecordId::from(1)]);
		assert!(tree[0].replies.is_empty());
	}

	#[test]
	fn json_input_that_is_not_a_list_is_empty() {
		assert!(build_comment_tree_from_json(&Value::Null).is_empty());
		assert!(build_comment_tree_from_json(&json!("not an array")).is_empty());

		let tree = build_comment_tree_from_json(&json!([
			{"id": 1, "author": "Mum"},
			{"id": 2, "parentCommentId": 1, "author": "Dad"}
		]));
		assert_eq!(tree.len(), 1);
		assert_eq!(tree[0].replies[0].comment.text_field(&["author"]), Some("Dad"));
	}

	#[test]
	fn long_reply_chain() {
		const DEPTH: i64 = 150_000;
		let mut list: Vec<Comment> = (1..DEPTH).map(|i| Comment::new(i).reply_to(i - 1)).collect();
		// Parent after its reply, to go through the index rather than list order.
		list.push(Comment::new(0));

		let tree = build_comment_tree(&list);
		assert_eq!(tree.len(), 1);
		assert_eq!(count_comments(&tree), list.len());

		let flat = flatten_comment_tree(&tree);
		assert_eq!(flat.len(), list.len());
		assert_eq!(flat.first().map(|c| c.id.clone()), Some(RecordId::from(0)));
		assert_eq!(
			flat.last().map(|c| c.id.clone()),
			Some(RecordId::from(DEPTH - 1))
		);

		drop(tree);
	}
}
