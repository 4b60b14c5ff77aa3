//! Workspace canvas engine for meti checklist projects.
//!
//! A project is shown as a tree of checklist boxes on a large grid-snapped
//! scene, hanging off a synthetic project root. This crate owns everything
//! between raw pointer input and storage writes: the scene graph, camera,
//! drag and creation gestures, hit-testing, layout and the display list.
//! It performs no I/O of its own; persistence goes through the
//! [`gateway::Gateway`] trait and the host reacts to returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::Canvas`]: event handlers, operations, load |
//! | [`scene`] | Node arena, parent index, connectors, creation preview |
//! | [`node`] | One checklist box and its drag behavior |
//! | [`creator`] | Creator handle gesture state machine |
//! | [`connector`] | Curved parent-child lines |
//! | [`doc`] | Project, checklist and check records; editor drafts |
//! | [`diff`] | Minimal check writes for an edit |
//! | [`gateway`] | Storage contract and the in-memory implementation |
//! | [`layout`] | Node sizing and part rectangles |
//! | [`hit`] | Hit-testing against nodes, handles and the root |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`geom`] | Rectangles, anchors and grid snapping |
//! | [`input`] | Input event types and the gesture state |
//! | [`render`] | Screen-space display list and SVG output |
//! | [`consts`] | Shared constants (grid, scene, layout, colors) |

pub mod camera;
pub mod connector;
pub mod consts;
pub mod creator;
pub mod diff;
pub mod doc;
pub mod engine;
pub mod gateway;
pub mod geom;
pub mod hit;
pub mod input;
pub mod layout;
pub mod node;
pub mod render;
pub mod scene;
