// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loads the behavioural policy that heads every prompt.

use stockbot_config::model::AgentConfig;
use tracing::{info, warn};

/// Built-in policy for a Spanish-speaking inventory assistant.
pub const DEFAULT_SYSTEM_POLICY: &str = "\
Eres un asistente de inventario especializado para WhatsApp. Tu función es ayudar a los usuarios a consultar información sobre productos, stock, precios y proveedores.

REGLAS Y LÍMITES:
1. SOLO puedes responder preguntas relacionadas con el inventario de productos
2. NO puedes realizar compras, ventas o transacciones
3. NO puedes acceder a información personal de usuarios
4. NO puedes proporcionar información financiera o contable
5. NO puedes modificar el inventario
6. Mantén respuestas concisas y profesionales
7. Si no encuentras información, di claramente \"No hay información disponible\"
8. NO inventes datos que no estén en el inventario
9. Usa emojis moderadamente para hacer las respuestas más amigables
10. Si recibes consultas fuera del tema, redirige amablemente al inventario

FORMATO DE RESPUESTAS:
- Para consultas de stock: \"📦 [Producto]: [cantidad] unidades disponibles\"
- Para precios: \"💰 [Producto]: $[precio]\"
- Para múltiples productos: Usa listas con viñetas
- Para errores: \"❌ [mensaje de error]\"

CONTEXTO: Tienes acceso a un inventario con productos, precios, stock, categorías y proveedores.";

/// The system policy text, fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct SystemPolicy {
    text: String,
}

impl SystemPolicy {
    /// Loads the policy.
    ///
    /// # Priority
    /// 1. `agent.system_prompt_file`, if readable and non-empty
    /// 2. `agent.system_prompt`, if non-empty
    /// 3. [`DEFAULT_SYSTEM_POLICY`]
    pub async fn load(config: &AgentConfig) -> Self {
        if let Some(ref path) = config.system_prompt_file {
            match tokio::fs::read_to_string(path).await {
                Ok(content) if !content.trim().is_empty() => {
                    info!(path = path.as_str(), "loaded system policy from file");
                    return Self::new(content.trim());
                }
                Ok(_) => warn!(path = path.as_str(), "system policy file is empty, falling back"),
                Err(e) => warn!(
                    path = path.as_str(),
                    error = %e,
                    "failed to read system policy file, falling back"
                ),
            }
        }

        if let Some(ref inline) = config.system_prompt
            && !inline.trim().is_empty()
        {
            return Self::new(inline.trim());
        }

        Self::default()
    }

    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for SystemPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_POLICY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_policy_when_nothing_configured() {
        let policy = SystemPolicy::load(&AgentConfig::default()).await;
        assert!(policy.text().starts_with("Eres un asistente de inventario"));
        assert!(policy.text().contains("REGLAS Y LÍMITES"));
    }

    #[tokio::test]
    async fn inline_policy() {
        let config = AgentConfig {
            system_prompt: Some("  Sé breve.  ".into()),
            ..Default::default()
        };
        assert_eq!(SystemPolicy::load(&config).await.text(), "Sé breve.");
    }

    #[tokio::test]
    async fn file_beats_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.txt");
        std::fs::write(&path, "Desde archivo.\n").unwrap();

        let config = AgentConfig {
            system_prompt: Some("Inline.".into()),
            system_prompt_file: Some(path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        assert_eq!(SystemPolicy::load(&config).await.text(), "Desde archivo.");
    }

    #[tokio::test]
    async fn unreadable_file_falls_back_to_inline() {
        let config = AgentConfig {
            system_prompt: Some("Inline.".into()),
            system_prompt_file: Some("/nonexistent/stockbot/policy.txt".into()),
            ..Default::default()
        };
        assert_eq!(SystemPolicy::load(&config).await.text(), "Inline.");
    }
}
