// Front ends: the upload page and the terminal printer share one HomeworkHelper.

pub mod terminal;
pub mod web;
