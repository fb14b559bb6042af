use crate::DeviceContext;

/// A resource whose driver objects are lost with the graphics context.
pub trait Volatile {
    fn load_volatile(&mut self, ctx: &mut dyn DeviceContext) -> anyhow::Result<()>;
    fn unload_volatile(&mut self, ctx: &mut dyn DeviceContext);
}

/// Recreates every resource after a context loss.
///
/// All resources are attempted; the first failure is returned.
pub fn reload_all(
    resources: &mut [&mut dyn Volatile],
    ctx: &mut dyn DeviceContext,
) -> anyhow::Result<()> {
    let mut first_error = None;
    for resource in resources.iter_mut() {
        resource.unload_volatile(ctx);
        if let Err(err) = resource.load_volatile(ctx) {
            log::error!("Failed to reload volatile resource: {:?}", err);
            first_error.get_or_insert(err);
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
