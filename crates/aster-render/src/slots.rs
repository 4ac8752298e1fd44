use wgpu::{BindGroup, BindGroupLayout, Buffer, Device};

/// A pool of uniform buffer slots, one per draw that needs its own copy of
/// a per-item uniform block. Slots are created on demand, reused across
/// frames and never shrink; `begin_frame` just rewinds the cursor.
pub struct SlotPool {
    label: &'static str,
    slot_size: u64,
    slots: Vec<Slot>,
    used: usize,
}

pub struct Slot {
    pub buffer: Buffer,
    pub bind_group: BindGroup,
}

impl SlotPool {
    pub fn new(label: &'static str, slot_size: u64) -> Self {
        Self {
            label,
            slot_size,
            slots: Vec::new(),
            used: 0,
        }
    }

    pub fn begin_frame(&mut self) {
        self.used = 0;
    }

    pub fn next(&mut self, device: &Device, layout: &BindGroupLayout) -> &Slot {
        if self.used == self.slots.len() {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: self.slot_size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(self.label),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.slots.push(Slot { buffer, bind_group });
        }
        let slot = &self.slots[self.used];
        self.used += 1;
        slot
    }

    pub fn destroy(&mut self) {
        for slot in self.slots.drain(..) {
            slot.buffer.destroy();
        }
        self.used = 0;
    }
}
