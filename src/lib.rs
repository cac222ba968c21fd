//! Registration form server.
//!
//! Serves a sign-up form and stores each submission as a row in the
//! `registration` table. The INSERT is shaped by the table's live schema:
//! only columns the table has are written, and columns with a default
//! (such as a sequence-backed `user_id`) are left to the database when the
//! form gives no value.
//!
//! ```text
//! GET  /               the form
//! POST /submit         duplicate checks + INSERT, then redirect to /success
//! GET  /success        confirmation
//! GET  /home_loggedin  landing page
//! GET  /login          unverified login stub (sets the `user` cookie)
//! GET  /logout
//! GET  /db_status
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod pages;
pub mod password;
pub mod routes;
pub mod state;
