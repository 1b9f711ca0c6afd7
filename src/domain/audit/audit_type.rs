//! Kinds of audited action.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Every action the audit log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditType {
    CreateFramework,
    FrameworkUpdate,
    CreateSupplier,
    SupplierUpdate,
    ContactUpdate,
    RegisterFrameworkInterest,
    AnswerSelectionQuestions,
    CreateAgreement,
    UpdateAgreement,
    SignAgreement,
    CountersignAgreement,
    ImportService,
    UpdateService,
    UpdateServiceStatus,
    CreateDraftService,
    UpdateDraftService,
    CompleteDraftService,
    UpdateDraftServiceStatus,
    DeleteDraftService,
    PublishDraftService,
    InviteUser,
}

impl AuditType {
    pub const ALL: [AuditType; 21] = [
        AuditType::CreateFramework,
        AuditType::FrameworkUpdate,
        AuditType::CreateSupplier,
        AuditType::SupplierUpdate,
        AuditType::ContactUpdate,
        AuditType::RegisterFrameworkInterest,
        AuditType::AnswerSelectionQuestions,
        AuditType::CreateAgreement,
        AuditType::UpdateAgreement,
        AuditType::SignAgreement,
        AuditType::CountersignAgreement,
        AuditType::ImportService,
        AuditType::UpdateService,
        AuditType::UpdateServiceStatus,
        AuditType::CreateDraftService,
        AuditType::UpdateDraftService,
        AuditType::CompleteDraftService,
        AuditType::UpdateDraftServiceStatus,
        AuditType::DeleteDraftService,
        AuditType::PublishDraftService,
        AuditType::InviteUser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditType::CreateFramework => "create_framework",
            AuditType::FrameworkUpdate => "framework_update",
            AuditType::CreateSupplier => "create_supplier",
            AuditType::SupplierUpdate => "supplier_update",
            AuditType::ContactUpdate => "contact_update",
            AuditType::RegisterFrameworkInterest => "register_framework_interest",
            AuditType::AnswerSelectionQuestions => "answer_selection_questions",
            AuditType::CreateAgreement => "create_agreement",
            AuditType::UpdateAgreement => "update_agreement",
            AuditType::SignAgreement => "sign_agreement",
            AuditType::CountersignAgreement => "countersign_agreement",
            AuditType::ImportService => "import_service",
            AuditType::UpdateService => "update_service",
            AuditType::UpdateServiceStatus => "update_service_status",
            AuditType::CreateDraftService => "create_draft_service",
            AuditType::UpdateDraftService => "update_draft_service",
            AuditType::CompleteDraftService => "complete_draft_service",
            AuditType::UpdateDraftServiceStatus => "update_draft_service_status",
            AuditType::DeleteDraftService => "delete_draft_service",
            AuditType::PublishDraftService => "publish_draft_service",
            AuditType::InviteUser => "invite_user",
        }
    }
}

impl fmt::Display for AuditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_value("audit type", s))
    }
}
