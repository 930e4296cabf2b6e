use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::ids::RecordId;

/// Comment key.
pub type CommentId = RecordId;

/// One gallery comment as returned by the API.
///
/// Everything besides `id` and `parentCommentId` (author, text, timestamps)
/// is kept untouched in `payload`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
	/// Unique within one comment list.
	pub id: CommentId,
	/// Comment this one replies to; `None` (or `null`) for a top-level comment.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_comment_id: Option<CommentId>,
	/// Remaining JSON fields.
	#[serde(flatten)]
	pub payload: Map<String, Value>,
}

impl Comment {
	/// Comment with no parent and an empty payload.
	pub fn new(id: impl Into<CommentId>) -> Self {
		Self {
			id: id.into(),
			parent_comment_id: None,
			payload: Map::new(),
		}
	}

	/// Builder-style parent assignment.
	pub fn reply_to(mut self, parent: impl Into<CommentId>) -> Self {
		self.parent_comment_id = Some(parent.into());
		self
	}

	/// Builder-style payload field.
	pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.payload.insert(key.to_owned(), value.into());
		self
	}

	/// First of `keys` present in the payload as a string.
	pub fn text_field(&self, keys: &[&str]) -> Option<&str> {
		keys.iter()
			.find_map(|key| self.payload.get(*key).and_then(Value::as_str))
	}
}

/// A comment with its replies nested below it, in input order.
///
/// Threads can be arbitrarily deep, so cloning, comparing and dropping walk
/// the tree with an explicit stack instead of recursing.
#[derive(Debug, Serialize)]
pub struct CommentNode {
	/// The comment itself.
	#[serde(flatten)]
	pub comment: Comment,
	/// Direct replies.
	pub replies: Vec<CommentNode>,
}

impl CommentNode {
	/// Leaf node without replies.
	pub fn leaf(comment: Comment) -> Self {
		Self {
			comment,
			replies: Vec::new(),
		}
	}

	/// Number of descendants at every depth, excluding this node.
	pub fn reply_count(&self) -> usize {
		pre_order(&self.replies).count()
	}
}

impl Clone for CommentNode {
	fn clone(&self) -> Self {
		Self {
			comment: self.comment.clone(),
			replies: assemble(
				pre_order(&self.replies)
					.map(|node| (node.comment.clone(), node.replies.len()))
					.collect(),
			),
		}
	}
}

impl PartialEq for CommentNode {
	fn eq(&self, other: &Self) -> bool {
		// Equal reply counts at every step keep the two walks in lockstep.
		self.comment == other.comment
			&& self.replies.len() == other.replies.len()
			&& pre_order(&self.replies)
				.zip(pre_order(&other.replies))
				.all(|(a, b)| a.comment == b.comment && a.replies.len() == b.replies.len())
	}
}

impl Drop for CommentNode {
	fn drop(&mut self) {
		let mut pending = std::mem::take(&mut self.replies);
		while let Some(mut node) = pending.pop() {
			pending.append(&mut node.replies);
		}
	}
}

/// Pre-order walk over a forest of comment nodes.
pub struct PreOrder<'a> {
	stack: Vec<&'a CommentNode>,
}

impl<'a> Iterator for PreOrder<'a> {
	type Item = &'a CommentNode;

	fn next(&mut self) -> Option<Self::Item> {
		let node = self.stack.pop()?;
		self.stack.extend(node.replies.iter().rev());
		Some(node)
	}
}

/// Visit every node of `forest`, parents before their replies, siblings in
/// order.
pub fn pre_order(forest: &[CommentNode]) -> PreOrder<'_> {
	PreOrder {
		stack: forest.iter().rev().collect(),
	}
}

/// Rebuild a forest from its pre-order listing of `(comment, reply count)`.
pub(super) fn assemble(order: Vec<(Comment, usize)>) -> Vec<CommentNode> {
	let mut built: Vec<CommentNode> = Vec::with_capacity(order.len());
	for (comment, reply_count) in order.into_iter().rev() {
		// Replies were finished last-first, so they sit reversed on top.
		let mut replies = built.split_off(built.len().saturating_sub(reply_count));
		replies.reverse();
		built.push(CommentNode { comment, replies });
	}
	built.reverse();
	built
}

/// Body of `GET /gallery/{id}/comments`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CommentsResponse {
	/// Raw comment list; see [`CommentsResponse::comments`].
	#[serde(default)]
	pub comments: Value,
	/// Server-side count, when sent.
	#[serde(default)]
	pub total: Option<u64>,
}

impl CommentsResponse {
	/// Parse a response body.
	pub fn from_json_str(body: &str) -> Result<Self, AppError> {
		Ok(serde_json::from_str(body)?)
	}

	/// Well-formed comments in the response, see [`comments_from_json`].
	pub fn comments(&self) -> Vec<Comment> {
		comments_from_json(&self.comments)
	}
}

/// Read a JSON value as a comment list.
///
/// Anything other than an array yields no comments. Array entries that are
/// not comment objects are dropped.
pub fn comments_from_json(value: &Value) -> Vec<Comment> {
	let Some(items) = value.as_array() else {
		if !value.is_null() {
			warn!("Expected a comment array, got {}", json_kind(value));
		}
		return Vec::new();
	};

	items
		.iter()
		.enumerate()
		.filter_map(|(i, item)| {
			Comment::deserialize(item)
				.map_err(|e| warn!("Skipping comment at index {i}: {e}"))
				.ok()
		})
		.collect()
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
