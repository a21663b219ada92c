//! Gemini-backed implementation of the [`TextCorrector`] port.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{AiCallError, CorrectionFields, TextCorrector};
use crate::procuracao::models::Procuracao;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// HTTP client for the Gemini generateContent endpoint.
///
/// Built from `GEMINI_API_KEY` / `GEMINI_MODEL`; without a key every call
/// reports [`AiCallError::NotConfigured`] and the pipeline degrades to the
/// uncorrected record.
pub struct GeminiCorrector {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiCorrector {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
        }
    }

    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        if api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            log::warn!("GEMINI_API_KEY não configurada; correção e análise com IA desativadas");
        }
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    async fn generate(&self, body: Value) -> Result<String, AiCallError> {
        let api_key = self.api_key.as_ref().ok_or(AiCallError::NotConfigured)?;
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.model, api_key
        );

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiCallError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .ok_or_else(|| AiCallError::Malformed("resposta sem candidatos".to_string()))
    }
}

#[async_trait]
impl TextCorrector for GeminiCorrector {
    async fn correct(&self, input: &CorrectionFields) -> Result<CorrectionFields, AiCallError> {
        let input_json =
            serde_json::to_string(input).map_err(|e| AiCallError::Malformed(e.to_string()))?;
        let prompt = format!(
            concat!(
                "Você é um assistente de revisão jurídica especializado em corrigir erros de ",
                "digitação e gramática em dados cadastrais.\n\n",
                "Sua tarefa:\n",
                "1. Analise os campos do JSON fornecido (nomes, nacionalidades, profissões, ",
                "endereços, obra, cidade).\n",
                "2. Corrija erros de ortografia (ex: \"Engenhero\" -> \"Engenheiro\", ",
                "\"Rau\" -> \"Rua\").\n",
                "3. Corrija acentuação (ex: \"Jao\" -> \"João\", \"Sao Paulo\" -> \"São Paulo\").\n",
                "4. Ajuste a capitalização (ex: \"maria da silva\" -> \"Maria da Silva\").\n",
                "5. Ajuste a concordância de gênero da nacionalidade e estado civil com base no ",
                "nome do procurador (ex: \"Maria\", \"Brasileiro\" -> \"Brasileira\").\n",
                "6. Se o endereço estiver desformatado mas legível, corrija a escrita dos ",
                "logradouros, preferência para norma culta.\n\n",
                "REGRAS CRÍTICAS:\n",
                "- NÃO altere números (números de casa, apto, CEP, etc).\n",
                "- NÃO invente dados. Se um campo estiver vazio ou \"N/A\", mantenha vazio.\n",
                "- NÃO altere o sentido da informação.\n\n",
                "Dados de Entrada:\n{}"
            ),
            input_json
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": correction_schema(),
            },
        });

        let text = self.generate(body).await?;
        serde_json::from_str(&text).map_err(|e| AiCallError::Malformed(e.to_string()))
    }

    async fn analyze(&self, record: &Procuracao) -> Result<String, AiCallError> {
        if self.api_key.is_none() {
            return Ok(
                "A chave da API do Gemini não está configurada. A análise não pode ser realizada."
                    .to_string(),
            );
        }

        let record_json = serde_json::to_string_pretty(record)
            .map_err(|e| AiCallError::Malformed(e.to_string()))?;
        let prompt = format!(
            concat!(
                "Analise os seguintes dados para uma procuração bancária da empresa ",
                "\"LCM CONSTRUÇÃO E COMÉRCIO S/A\".\n",
                "Aja como um assistente jurídico sênior e revise as informações.\n",
                "Seu objetivo é identificar possíveis inconsistências, erros de digitação óbvios, ",
                "informações que parecem incompletas (ex: CPF com número de dígitos incorreto, ",
                "RG sem órgão emissor, etc.) ou quaisquer outros pontos que mereçam uma segunda ",
                "verificação antes de gerar o documento oficial.\n",
                "Verifique especificamente a consistência entre os dados dos procuradores e os ",
                "dados bancários.\n",
                "Forneça sua análise em português, em formato de lista (bullet points). Seja ",
                "conciso e direto. Se tudo parecer correto, simplesmente afirme que os dados ",
                "parecem consistentes e prontos para geração.\n\n",
                "Dados para análise:\n{}"
            ),
            record_json
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        self.generate(body).await
    }
}

/// JSON schema forcing the correction response into the exact field set we
/// sent out.
fn correction_schema() -> Value {
    let fields = [
        "procurador1_nome",
        "procurador1_nacionalidade",
        "procurador1_profissao",
        "procurador1_estado_civil",
        "procurador1_endereco",
        "procurador2_nome",
        "procurador2_nacionalidade",
        "procurador2_profissao",
        "procurador2_estado_civil",
        "procurador2_endereco",
        "obra",
        "cidade_emissao",
    ];
    let mut properties = serde_json::Map::new();
    for field in fields {
        properties.insert(field.to_string(), json!({ "type": "STRING" }));
    }
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": fields,
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correction_schema_covers_all_fields() {
        let schema = correction_schema();
        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 12);
        assert!(properties.contains_key("cidade_emissao"));
        assert_eq!(schema["required"].as_array().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_unconfigured_key_behaviour() {
        let corrector = GeminiCorrector::new(None, DEFAULT_MODEL);
        let err = corrector
            .correct(&CorrectionFields::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AiCallError::NotConfigured));

        let notice = corrector.analyze(&Procuracao::default()).await.unwrap();
        assert!(notice.contains("não está configurada"));
    }
}
