// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod app;
mod command;
mod conversation;
mod draw;
mod keys;
mod layout;
mod message;
mod session;
mod view;
mod widgets;

pub use app::{App, AppOptions};
pub use command::{list_dir, Collaborators, Command, DirEntry, Dispatcher, Exchange};
pub use conversation::{ConversationLog, Snapshot};
pub use keys::{map_key, Action};
pub use message::{msg_from_event, Msg};
pub use session::{Exit, Phase, Session, SessionContext, Stage};
pub use view::{compose, ViewParts};
pub use widgets::{FileBrowser, LineInput, TextArea, Viewport, Widget};
