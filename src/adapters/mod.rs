pub mod bot;
pub mod controllers;
pub mod dto;
pub mod error;
pub mod repositories;
pub mod state;
