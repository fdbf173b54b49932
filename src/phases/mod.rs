//! The two phases of a platform bootstrap.
//!
//! ## Overview
//!
//! 1. Gitops Tree Selection - Reduce the template tree to one provider
//!    variant and one cluster type, then detokenize `repos.tf`
//! 2. Metaphor Assembly - Move the sample application into its own
//!    repository with CI content, one commit and an `origin` remote
//!
//! Phase 2 reads the tree phase 1 produced, so the phases always run in
//! this order. Each phase only describes its work as a [`Plan`]; running
//! the plan is left to the [`Provisioner`].
//!
//! [`Plan`]: crate::plan::Plan
//! [`Provisioner`]: crate::provisioner::Provisioner

pub mod gitops;
pub mod metaphor;
pub mod orchestrator;
