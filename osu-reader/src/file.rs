pub mod beatmap;
pub mod replay;
