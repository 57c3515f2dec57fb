// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt composition: policy + the whole inventory + the user's request.
//!
//! Nothing is filtered or summarised here. The model gets every row.

use stockbot_core::types::{InventoryTable, MediaKind};
use stockbot_inventory::{column_list, render_table};

use crate::policy::SystemPolicy;

const NO_INVENTORY: &str = "No hay datos de inventario";
const CLOSING: &str =
    "Responde siguiendo las reglas establecidas y usando solo la información del inventario.";

/// Builds the single text input sent to the model.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    policy: SystemPolicy,
}

impl PromptComposer {
    pub fn new(policy: SystemPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SystemPolicy {
        &self.policy
    }

    /// Prompt for a text question.
    pub fn compose_query(&self, inventory: &InventoryTable, user_query: &str) -> String {
        let table = if inventory.is_empty() {
            NO_INVENTORY.to_string()
        } else {
            render_table(inventory)
        };
        format!(
            "{policy}\n\n\
             DATOS DEL INVENTARIO:\n\
             Columnas disponibles: {columns}\n\n\
             Inventario completo:\n\
             {table}\n\n\
             CONSULTA DEL USUARIO: {user_query}\n\n\
             {CLOSING}",
            policy = self.policy.text(),
            columns = column_list(inventory),
        )
    }

    /// Prompt sent alongside an uploaded image or audio file. A non-empty
    /// caption is passed through as the user's message.
    pub fn compose_media(
        &self,
        inventory: &InventoryTable,
        kind: MediaKind,
        caption: Option<&str>,
    ) -> String {
        let table = if inventory.is_empty() {
            NO_INVENTORY.to_string()
        } else {
            render_table(inventory)
        };
        let task = match kind {
            MediaKind::Image => "Analiza esta imagen",
            MediaKind::Audio => "Analiza este audio",
        };
        let caption = caption
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| format!("\nMENSAJE DEL USUARIO: {c}\n"))
            .unwrap_or_default();

        format!(
            "{policy}\n\n\
             DATOS DEL INVENTARIO:\n\
             {table}\n\n\
             TAREA: {task} y busca información relacionada en el inventario.\n\
             {caption}\n\
             {CLOSING}",
            policy = self.policy.text(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory() -> InventoryTable {
        InventoryTable {
            columns: vec!["ID".into(), "Producto".into(), "Stock".into()],
            rows: vec![
                vec!["1".into(), "Laptop Dell XPS 13".into(), "5".into()],
                vec!["2".into(), "Mouse Logitech".into(), "25".into()],
            ],
        }
    }

    fn composer() -> PromptComposer {
        PromptComposer::new(SystemPolicy::new("POLITICA"))
    }

    #[test]
    fn query_prompt_has_every_section_in_order() {
        let prompt = composer().compose_query(&inventory(), "¿tienen laptops Dell?");
        let positions: Vec<usize> = [
            "POLITICA",
            "DATOS DEL INVENTARIO:",
            "Columnas disponibles: ['ID', 'Producto', 'Stock']",
            "Inventario completo:",
            "Laptop Dell XPS 13",
            "CONSULTA DEL USUARIO: ¿tienen laptops Dell?",
            CLOSING,
        ]
        .iter()
        .map(|needle| prompt.find(needle).expect(needle))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn query_prompt_includes_all_rows() {
        let prompt = composer().compose_query(&inventory(), "stock");
        assert!(prompt.contains("Mouse Logitech"));
        assert!(prompt.contains("25"));
    }

    #[test]
    fn media_prompt_uses_placeholder_for_empty_inventory() {
        let prompt = composer().compose_media(&InventoryTable::empty(), MediaKind::Image, None);
        assert!(prompt.contains(NO_INVENTORY));
        assert!(prompt.contains("TAREA: Analiza esta imagen"));
        assert!(!prompt.contains("MENSAJE DEL USUARIO"));
        assert!(prompt.ends_with(CLOSING));
    }

    #[test]
    fn media_prompt_carries_caption() {
        let prompt =
            composer().compose_media(&inventory(), MediaKind::Audio, Some(" ¿cuánto cuesta? "));
        assert!(prompt.contains("TAREA: Analiza este audio"));
        assert!(prompt.contains("MENSAJE DEL USUARIO: ¿cuánto cuesta?"));
        assert!(prompt.contains("Laptop Dell XPS 13"));
    }

    #[test]
    fn blank_caption_is_dropped() {
        let prompt = composer().compose_media(&inventory(), MediaKind::Image, Some("   "));
        assert!(!prompt.contains("MENSAJE DEL USUARIO"));
    }
}
