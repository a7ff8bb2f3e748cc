//! Typed GPU buffers: a growable vertex/instance buffer and a fixed-size
//! uniform buffer.

use std::marker::PhantomData;

use wgpu::util::DeviceExt;

/// A GPU buffer of `T` that grows when a write exceeds its capacity.
///
/// Uses a 2x growth strategy and never shrinks.
pub struct TypedBuffer<T> {
    buffer: wgpu::Buffer,
    capacity: usize,
    count: usize,
    usage: wgpu::BufferUsages,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Buffer initialized from `data` (at least one item of capacity).
    #[must_use]
    pub fn new_with_data(
        device: &wgpu::Device,
        label: &str,
        data: &[T],
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = data.len().max(1);
        let buffer = if data.is_empty() {
            Self::allocate(device, label, capacity, usage)
        } else {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: usage | wgpu::BufferUsages::COPY_DST,
            })
        };
        Self {
            buffer,
            capacity,
            count: data.len(),
            usage,
            label: label.to_owned(),
            _marker: PhantomData,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * size_of::<T>()) as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Write `data` from the start of the buffer, growing if necessary.
    ///
    /// Returns `true` if the buffer was reallocated (bind groups need
    /// recreation).
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let reallocated = data.len() > self.capacity;
        if reallocated {
            self.capacity = (data.len() * 2).max(self.capacity + 64);
            self.buffer.destroy();
            self.buffer =
                Self::allocate(device, &self.label, self.capacity, self.usage);
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.count = data.len();
        reallocated
    }

    /// The underlying buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Items written by the last write.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the last write was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Capacity in items.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// A uniform buffer holding exactly one `T`.
pub struct UniformBuffer<T> {
    buffer: wgpu::Buffer,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> UniformBuffer<T> {
    /// Uniform buffer initialized with `value`.
    #[must_use]
    pub fn new(device: &wgpu::Device, label: &str, value: &T) -> Self {
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(value),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        Self {
            buffer,
            _marker: PhantomData,
        }
    }

    /// Overwrite the value.
    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }

    /// The underlying buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Whole-buffer binding resource.
    #[must_use]
    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}
