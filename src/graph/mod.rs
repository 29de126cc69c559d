pub mod dot;
pub mod edge_list;
