//! Actor packets: listing a cell's actors and taking over their simulation.

use tracing::{debug, instrument};

use crate::error::Result;
use crate::protocol::kinds::ActorKind;
use crate::protocol::registry::ActorRegistry;
use crate::sync::{Outcome, SessionContext};
use crate::world::{ActorList, CellStore, EventAction};

#[instrument(level = "trace", skip_all, fields(kind = ?kind, cell = %list.cell))]
pub fn handle(
    ctx: &mut SessionContext,
    registry: &ActorRegistry,
    kind: ActorKind,
    list: &ActorList,
    cells: &mut dyn CellStore,
) -> Result<Outcome> {
    match kind {
        ActorKind::ActorList => {
            if !list.action.is_request() {
                debug!(action = ?list.action, count = list.actors.len(), "Actor list received");
                return Ok(Outcome::Ignored);
            }
            let Some(cell) = cells.get_cell(&list.cell) else {
                debug!("Actor list requested for unloaded cell");
                return Ok(Outcome::Skipped);
            };
            let reply = ActorList {
                cell: list.cell.clone(),
                action: EventAction::Set,
                actors: cell.actors(),
            };
            let handler = registry.lookup(kind.as_u8())?;
            ctx.reply(handler.encode(ctx.local_guid(), &reply));
            Ok(Outcome::Replied)
        }
        ActorKind::ActorAuthority => {
            if cells.initialize_local_actors(&list.cell) {
                debug!("Took authority over cell actors");
                Ok(Outcome::Applied)
            } else {
                debug!("Authority granted for unloaded cell");
                Ok(Outcome::Skipped)
            }
        }
    }
}
