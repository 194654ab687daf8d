pub mod playlist_id;
pub mod track;
