pub mod fs_helper;
