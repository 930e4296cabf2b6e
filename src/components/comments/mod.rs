//! Photo comment threads: reply-tree assembly and the thread view.

mod component;
mod tree;
mod types;

pub use component::CommentThread;
pub use tree::{
	build_comment_tree, build_comment_tree_from_json, count_comments, flatten_comment_tree,
};
pub use types::{
	Comment, CommentId, CommentNode, CommentsResponse, PreOrder, comments_from_json, pre_order,
};
