//! Modification-instruction management.
//!
//! Instructions are attached when an approver requests changes and are
//! resolved independently of the revision's own status transitions.

use std::sync::Arc;

use ringi_core::error::CoreError;
use ringi_core::instruction::{validate_instruction_text, validate_required_fields};
use ringi_core::types::UserId;
use uuid::Uuid;

use ringi_db::models::instruction::{CreateInstruction, NewInstruction, RevisionInstruction};
use ringi_db::store::InstructionStore;

pub struct InstructionService {
    instructions: Arc<dyn InstructionStore>,
}

impl InstructionService {
    pub fn new(instructions: Arc<dyn InstructionStore>) -> Self {
        Self { instructions }
    }

    /// Attach an instruction to a revision.
    pub async fn create_instruction(
        &self,
        revision_id: Uuid,
        input: CreateInstruction,
        instructor_id: UserId,
    ) -> Result<RevisionInstruction, CoreError> {
        validate_instruction_text(&input.instruction_text)?;
        if let Some(fields) = &input.required_fields {
            validate_required_fields(fields)?;
        }

        let instruction = self
            .instructions
            .create(&NewInstruction {
                revision_id,
                instructor_id,
                instruction_text: input.instruction_text,
                required_fields: input.required_fields,
                priority: input.priority,
                due_date: input.due_date,
            })
            .await?;

        tracing::info!(
            instruction_id = %instruction.id,
            revision_id = %revision_id,
            instructor_id = %instructor_id,
            "modification instruction created"
        );

        Ok(instruction)
    }

    /// All instructions for a revision, oldest first.
    pub async fn get_instructions_for_revision(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<RevisionInstruction>, CoreError> {
        Ok(self.instructions.list_for_revision(revision_id).await?)
    }

    /// Instructions not yet marked resolved.
    pub async fn get_unresolved_instructions(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<RevisionInstruction>, CoreError> {
        Ok(self.instructions.list_unresolved(revision_id).await?)
    }

    /// Mark an instruction resolved.
    pub async fn resolve_instruction(
        &self,
        instruction_id: Uuid,
        resolution_comment: Option<&str>,
    ) -> Result<RevisionInstruction, CoreError> {
        let resolved = self
            .instructions
            .resolve(instruction_id, resolution_comment, chrono::Utc::now())
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "instruction",
                id: instruction_id.to_string(),
            })?;

        tracing::info!(
            instruction_id = %instruction_id,
            "modification instruction resolved"
        );

        Ok(resolved)
    }
}
