//! Client components and the tree/geometry logic behind them.

pub mod comments;
pub mod family_tree;
