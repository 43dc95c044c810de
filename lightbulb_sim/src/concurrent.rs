//! Concurrent mode: one tokio task per agent.
//!
//! Agents run as independent tasks that share a [`SharedRoom`]. A warden
//! picks who is summoned next and waits for that agent's turn to finish
//! before summoning anyone else, and the room's lock keeps each turn's
//! read-act-write atomic. Together they preserve the one-bit-per-step
//! channel the protocols are proven against.
//!
//! ```text
//!   warden ──summon──► agent task #k ──visit──► SharedRoom { signal, strategy }
//!     ▲                     │
//!     └──────verdict────────┘   (oneshot)
//! ```

use crate::oracle::VisitOracle;
use crate::runner::RunOutcome;

use lightbulb_core::{ProtocolError, Result, Strategy};
use lightbulb_env::{AgentId, EnvError, SharedRoom, SimulationContext};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

/// Runs `strategy` to certification with every agent as its own task.
pub async fn run_concurrent<S, C>(strategy: S, ctx: &mut C) -> Result<RunOutcome>
where
    S: Strategy + 'static,
    C: SimulationContext + ?Sized,
{
    let config = *strategy.config();
    let name = strategy.name();
    let population = config.population;
    let room = SharedRoom::new(strategy);
    
    let mut summons = Vec::with_capacity(population as usize);
    let mut tasks = Vec::with_capacity(population as usize);
    for agent in AgentId::all(population) {
        let (summon_tx, mut summon_rx) = mpsc::channel::<oneshot::Sender<bool>>(1);
        let room = room.clone();
        
        tasks.push(tokio::spawn(async move {
            while let Some(reply) = summon_rx.recv().await {
                let certified = room
                    .visit(|signal, strategy: &mut S| strategy.observe(agent, signal))
                    .await;
                if reply.send(certified).is_err() {
                    break;
                }
            }
        }));
        summons.push(summon_tx);
    }
    
    let mut oracle = VisitOracle::new(population);
    let mut steps = 0u64;
    let result = loop {
        let agent = ctx.pick_agent(population);
        if let Err(e) = agent.ensure_within(population) {
            break Err(ProtocolError::from(e));
        }
        oracle.record(agent);
        steps += 1;
        
        let (reply_tx, reply_rx) = oneshot::channel();
        if summons[agent.index()].send(reply_tx).await.is_err() {
            break Err(EnvError::room_closed(format!("agent {} task exited", agent)).into());
        }
        let certified = match reply_rx.await {
            Ok(certified) => certified,
            Err(_) => break Err(EnvError::room_closed(format!("agent {} dropped its turn", agent)).into()),
        };
        
        if certified {
            if oracle.all_visited() {
                break Ok(());
            }
            error!(
                "{} certified at step {} with only {} of {} agents activated",
                name,
                steps,
                oracle.distinct(),
                population
            );
            break Err(ProtocolError::PrematureCertification {
                step: steps,
                visited: oracle.distinct(),
                population: population as usize,
            });
        }
    };
    
    // Closing the summons channels ends every agent task
    drop(summons);
    for task in tasks {
        let _ = task.await;
    }
    result?;
    
    let (counted, credited, signal_transitions) = room
        .visit(|signal, strategy: &mut S| (strategy.counted(), strategy.credited(), signal.transitions()))
        .await;
    debug!("{} certified concurrently after {} steps", name, steps);
    
    Ok(RunOutcome {
        strategy: name,
        seed: ctx.seed(),
        population,
        steps,
        counted,
        credited,
        signal_transitions,
        visits: oracle.counts().to_vec(),
    })
}
