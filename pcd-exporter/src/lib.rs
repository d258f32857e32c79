pub mod pcd;
