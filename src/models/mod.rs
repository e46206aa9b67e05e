pub mod cupom;
pub mod event;
pub mod fila;
pub mod visitante;

pub use cupom::Cupom;
pub use event::{Event, EventPayload};
pub use fila::Fila;
pub use visitante::Visitante;

/// Attribute names shared by the handlers and the stored item layout.
pub const EVENTO_NOME: &str = "eventoNome";
pub const EVENTO_DATA: &str = "eventoData";
pub const EVENTO_FILAS: &str = "eventoFilas";
pub const EVENTO_SERVICOS: &str = "eventoServicos";
pub const EVENTO_VISITANTES: &str = "eventoVisitantes";

pub const QUANT_PESSOAS: &str = "quantPessoas";
pub const FILA_ATIVA: &str = "filaAtiva";
pub const TEMPO_FILA: &str = "tempoFila";
pub const PESSOAS_FILA: &str = "pessoasFila";

pub const QUANTIDADE: &str = "quantidade";
pub const PESSOAS_CUPOM: &str = "pessoasCupom";

pub const ID_FILA: &str = "idFila";
pub const CUPONS_USADOS: &str = "cuponsUsados";

/// `idFila` value of a visitor that is not in any queue.
pub const SEM_FILA: &str = "0";
