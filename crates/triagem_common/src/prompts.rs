//! Prompt construction for the intent classifier.
//!
//! The rule list is ordered first-match-wins: "fatura" alone, "fatura para
//! pagamento" and "quero pagar fatura" land on three different services,
//! and the earlier rule takes priority for near-duplicate phrasings.

use crate::catalog::ServiceCatalog;
use std::fmt::Write;

/// System message sent with every classification request.
pub const CLASSIFIER_SYSTEM_PROMPT: &str = "Você é um classificador de intenções de cliente.";

/// Render the full instruction block for one utterance: the enumerated
/// catalog, the disambiguation rules, worked examples, the id-0 contract
/// for non-domain utterances, and the utterance itself.
pub fn classification_prompt(catalog: &ServiceCatalog, utterance: &str) -> String {
    let mut list = String::new();
    for entry in catalog.iter() {
        let _ = writeln!(list, "{} - {}", entry.id, entry.label);
    }

    format!(
        r#"Classifique intenção de cliente brasileiro sobre CARTÃO DE CRÉDITO/BANCO. Aceite gírias e erros.

IMPORTANTE: Se a intenção NÃO for sobre cartão/banco/fatura/limite/saldo, retorne {{"id":0,"name":""}}.

Serviços bancários:
{list}
REGRAS CRÍTICAS:
• "disponível usar/gastar/comprar" no contexto de CARTÃO→1 (Limite)
• "saldo disponível/conta"→12 (Saldo)
• "vencimento/quando fecha/vence"→1, NÃO 3
• "pagar negociação/acordo"→2 (obter boleto)
• "meu boleto" sem contexto→3 (Fatura)
• "fatura para pagamento"→3 (obter fatura), NÃO 13
• "quero/vou pagar fatura"→13 (Pagamento)
• "segunda via fatura"→3
• "problema cartão"→5, NÃO 14
• "cartão para uso"→9
• "perda/extravio/roubo cartão"→11
• "cancelar seguro"→8
• "extrato/saldo"→12
• "registrar problema"→14
• "código/token fazer cartão"→16

Exemplos VÁLIDOS:
"quando fecha fatura"→1 | "pagar negociação"→2 | "quero meu boleto"→3 | "fatura para pagamento"→3
"cartão não chegou"→4 | "problema cartão"→5 | "cancelar assistência"→8 | "cartão para uso"→9
"extravio cartão"→11 | "saldo disponível"→12 | "quero pagar fatura"→13 | "queixa"→14 | "token"→16

Exemplos INVÁLIDOS (retorne id:0):
"pizza"→0 | "cinema"→0 | "tempo"→0 | "consulta médica"→0 | "notebook"→0

Frase: "{utterance}"
JSON: {{"id":N,"name":"nome"}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_enumerates_every_service() {
        let catalog = ServiceCatalog::default();
        let prompt = classification_prompt(&catalog, "qualquer coisa");
        for entry in catalog.iter() {
            let line = format!("{} - {}", entry.id, entry.label);
            assert!(prompt.contains(&line), "missing catalog line: {line}");
        }
    }

    #[test]
    fn test_prompt_embeds_utterance_verbatim() {
        let catalog = ServiceCatalog::default();
        let prompt = classification_prompt(&catalog, "quero meu boleto");
        assert!(prompt.contains("Frase: \"quero meu boleto\""));
    }

    #[test]
    fn test_prompt_states_the_zero_id_contract() {
        let catalog = ServiceCatalog::default();
        let prompt = classification_prompt(&catalog, "pizza");
        assert!(prompt.contains(r#"retorne {"id":0,"name":""}"#));
        assert!(prompt.contains(r#"JSON: {"id":N,"name":"nome"}"#));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let catalog = ServiceCatalog::default();
        let a = classification_prompt(&catalog, "saldo disponível");
        let b = classification_prompt(&catalog, "saldo disponível");
        assert_eq!(a, b);
    }
}
